use crate::error::Result;
use crate::table::ContestTable;
use crate::types::{Entry, PlayerInfo};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Canonical contest artifact produced by the ingestion step.
///
/// Ingestion owns CSV parsing, name normalization, and the salary join;
/// by the time this artifact exists, rosters reference players by id
/// and unmatched names are reduced to a diagnostics list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContestArtifact {
    pub site: String,
    pub sport: String,
    pub players: Vec<PlayerInfo>,
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub unmatched_players: Vec<String>,
}

impl ContestArtifact {
    /// Validate and freeze the artifact into a query-ready table.
    pub fn freeze(self) -> Result<ContestTable> {
        ContestTable::freeze(
            self.site,
            self.sport,
            self.entries,
            self.players,
            self.unmatched_players,
        )
    }
}

/// Load a contest artifact from disk and freeze it.
pub async fn load_contest<P: AsRef<Path>>(path: P) -> Result<ContestTable> {
    info!("Loading contest artifact from: {:?}", path.as_ref());

    let json = tokio::fs::read_to_string(&path).await?;
    let artifact: ContestArtifact = serde_json::from_str(&json)?;

    info!(
        entries = artifact.entries.len(),
        players = artifact.players.len(),
        unmatched = artifact.unmatched_players.len(),
        "Parsed contest artifact"
    );

    let table = artifact.freeze()?;
    info!(entries = table.total_entries(), "Contest table frozen");
    Ok(table)
}
