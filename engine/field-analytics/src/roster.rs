//! Roster resolution shared by every index builder.
//!
//! Each builder works from the same per-entry view: the roster with
//! duplicate slots collapsed, unresolvable player references removed,
//! and ids sorted so subset keys come out canonical.

use contest_registry::{ContestTable, EntryId, PlayerId};
use std::collections::HashSet;
use tracing::warn;

/// One entry's usable roster: sorted, deduplicated, resolved ids only.
#[derive(Debug, Clone)]
pub struct ResolvedRoster {
    pub entry_id: EntryId,
    pub players: Vec<PlayerId>,
}

/// Build-time data-integrity counters, surfaced to presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostics {
    /// Roster slots referencing a player id absent from the player table
    pub unresolved_refs: usize,
    /// Roster slots dropped as duplicates within one entry
    pub duplicate_slots: usize,
}

/// Resolve every entry's roster against the player table.
///
/// A reference to an unknown player id is a data-integrity warning, not
/// a failure: the slot is excluded from all downstream indices and
/// counted in [`Diagnostics::unresolved_refs`].
pub fn resolve_rosters(table: &ContestTable) -> (Vec<ResolvedRoster>, Diagnostics) {
    let mut rosters = Vec::with_capacity(table.total_entries());
    let mut diagnostics = Diagnostics::default();
    let mut warned: HashSet<PlayerId> = HashSet::new();

    for entry in table.entries() {
        let mut players: Vec<PlayerId> = Vec::with_capacity(entry.roster.len());
        for &player_id in &entry.roster {
            if table.player(player_id).is_none() {
                diagnostics.unresolved_refs += 1;
                if warned.insert(player_id) {
                    warn!(player_id, "roster references unknown player id");
                }
                continue;
            }
            players.push(player_id);
        }
        players.sort_unstable();
        let before = players.len();
        players.dedup();
        diagnostics.duplicate_slots += before - players.len();

        rosters.push(ResolvedRoster { entry_id: entry.entry_id, players });
    }

    (rosters, diagnostics)
}
