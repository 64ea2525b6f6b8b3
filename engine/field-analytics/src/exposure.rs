//! # Exposure Summarizer
//!
//! Per-player ownership: which entries roster each player. Percentages
//! are derived at query time against the active window, never stored.

use crate::roster::ResolvedRoster;
use contest_registry::{EntryId, PlayerId};
use std::collections::HashMap;

/// Map from player id to the deduplicated entries rostering that player.
///
/// Single O(N * L) pass; read-only after construction.
pub struct ExposureIndex {
    map: HashMap<PlayerId, Vec<EntryId>>,
}

impl ExposureIndex {
    pub fn build(rosters: &[ResolvedRoster]) -> Self {
        let mut map: HashMap<PlayerId, Vec<EntryId>> = HashMap::new();
        for roster in rosters {
            for &player_id in &roster.players {
                let list = map.entry(player_id).or_default();
                if list.last() != Some(&roster.entry_id) {
                    list.push(roster.entry_id);
                }
            }
        }
        Self { map }
    }

    /// Players with at least one entry
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn entries_for(&self, player_id: PlayerId) -> Option<&[EntryId]> {
        self.map.get(&player_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Vec<EntryId>)> {
        self.map.iter().map(|(&id, ids)| (id, ids))
    }
}
