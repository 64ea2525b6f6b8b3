use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique entry identifier within one contest
pub type EntryId = u64;
/// Shared player identifier, assigned during ingestion
pub type PlayerId = u32;
/// 1-based contest rank
pub type Rank = u32;

/// One submitted contest lineup, frozen after ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within the contest
    pub entry_id: EntryId,

    /// Not unique; a user may submit many entries
    pub username: String,

    /// 1-based finish rank (unique ordering key; artifact ties broken
    /// by ascending entry_id when the table is frozen)
    pub rank: Rank,

    /// Fantasy points scored
    pub points: f64,

    /// Ordered roster of player references, size fixed by game format
    pub roster: Vec<PlayerId>,
}

/// Slate-level player data, stored once and referenced by id from rosters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: PlayerId,

    /// Normalized display name (e.g. "Jayson Tatum")
    pub name: String,

    /// Team abbreviation (e.g. "BOS"), if resolved during ingestion
    pub team: Option<String>,

    /// Game identifier pairing two teams (e.g. "BOS@NYK")
    pub game_id: Option<String>,

    /// Slate salary, if resolved during ingestion
    pub salary: Option<u32>,
}

/// Contest-level metadata carried alongside the frozen table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestMeta {
    /// Contest site (e.g. "draftkings")
    pub site: String,

    /// Sport code (e.g. "nba")
    pub sport: String,

    /// Entry count after validation
    pub n_entries: usize,

    /// Distinct players on the slate
    pub n_players: usize,

    /// When this table was loaded into the session
    pub loaded_at: DateTime<Utc>,
}
