use crate::error::{RegistryError, Result};
use crate::types::{ContestMeta, Entry, EntryId, PlayerId, PlayerInfo, Rank};
use chrono::Utc;
use std::collections::HashMap;
use tracing::warn;

/// Frozen contest table: entries sorted by (rank, entry_id), plus shared
/// player data and id lookups.
///
/// Built once per contest load and read-only thereafter, so it can be
/// shared across query threads without locking. Rosters hold
/// [`PlayerId`] back-references into the shared player map; player data
/// is never copied per entry.
pub struct ContestTable {
    meta: ContestMeta,
    entries: Vec<Entry>,
    players: HashMap<PlayerId, PlayerInfo>,
    positions: HashMap<EntryId, usize>,
    unmatched_players: Vec<String>,
}

impl ContestTable {
    /// Validate, sort, and freeze a contest.
    ///
    /// Drops duplicate entry ids (keeping the first occurrence) with a
    /// warning, mirroring upstream ingestion. An empty entry set or a
    /// zero rank is a hard error: the table is the one input every
    /// downstream index trusts.
    pub fn freeze(
        site: String,
        sport: String,
        mut entries: Vec<Entry>,
        players: Vec<PlayerInfo>,
        unmatched_players: Vec<String>,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(RegistryError::EmptyContest);
        }
        for entry in &entries {
            if entry.rank == 0 {
                return Err(RegistryError::InvalidEntry {
                    entry_id: entry.entry_id,
                    reason: "rank must be 1-based".to_string(),
                });
            }
        }

        // Stable tie-break for equal ranks: ascending entry_id.
        entries.sort_by_key(|e| (e.rank, e.entry_id));

        let mut positions = HashMap::with_capacity(entries.len());
        let mut deduped = Vec::with_capacity(entries.len());
        for entry in entries {
            if positions.contains_key(&entry.entry_id) {
                warn!(entry_id = entry.entry_id, "dropping duplicate entry id");
                continue;
            }
            positions.insert(entry.entry_id, deduped.len());
            deduped.push(entry);
        }

        let players: HashMap<PlayerId, PlayerInfo> =
            players.into_iter().map(|p| (p.player_id, p)).collect();

        let meta = ContestMeta {
            site,
            sport,
            n_entries: deduped.len(),
            n_players: players.len(),
            loaded_at: Utc::now(),
        };

        Ok(Self { meta, entries: deduped, players, positions, unmatched_players })
    }

    pub fn meta(&self) -> &ContestMeta {
        &self.meta
    }

    /// Entries in rank order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, entry_id: EntryId) -> Option<&Entry> {
        self.positions.get(&entry_id).map(|&i| &self.entries[i])
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(&player_id)
    }

    pub fn player_name(&self, player_id: PlayerId) -> Option<&str> {
        self.players.get(&player_id).map(|p| p.name.as_str())
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values()
    }

    /// Unmatched-name diagnostics from ingestion, surfaced to
    /// presentation untouched.
    pub fn unmatched_players(&self) -> &[String] {
        &self.unmatched_players
    }

    /// Display percentile for a rank: 0.0 for the winner, 100.0 for the
    /// last entry. Single-entry contests report 0.0.
    pub fn percentile_of_rank(&self, rank: Rank) -> f64 {
        let total = self.entries.len();
        if total <= 1 {
            return 0.0;
        }
        (rank.saturating_sub(1) as f64 / (total - 1) as f64) * 100.0
    }
}
