//! # Combination Index
//!
//! Maps every k-player combination appearing in the field to the entries
//! that roster it, plus the O(N) full-roster special case used for
//! duplicate-lineup detection.

use crate::roster::ResolvedRoster;
use contest_registry::{EntryId, PlayerId};
use std::collections::HashMap;

/// Canonical combination key: player ids sorted ascending.
///
/// Two entries produce the same key iff they roster the same unordered
/// set of k players; slot order never matters.
pub type ComboKey = Vec<PlayerId>;

/// Index of k-player combinations to contributing entry ids.
///
/// Built once per contest load; cost is O(N * C(L, k)), which is why k
/// is capped at a small constant in `AnalysisConfig`. Entry id lists are
/// deduplicated: one occurrence per entry per key.
pub struct ComboIndex {
    size: usize,
    map: HashMap<ComboKey, Vec<EntryId>>,
}

impl ComboIndex {
    /// Enumerate all k-subsets of each resolved roster.
    ///
    /// Rosters with fewer than k usable players contribute nothing,
    /// which also covers k > roster size.
    pub fn build(rosters: &[ResolvedRoster], size: usize) -> Self {
        let mut map: HashMap<ComboKey, Vec<EntryId>> = HashMap::new();
        let mut scratch = Vec::with_capacity(size);

        for roster in rosters {
            if size == 0 || roster.players.len() < size {
                continue;
            }
            emit_subsets(&roster.players, size, 0, &mut scratch, &mut |combo| {
                let list = map.entry(combo.to_vec()).or_default();
                // Roster ids are already deduplicated, so each subset
                // occurs once per entry; guard anyway.
                if list.last() != Some(&roster.entry_id) {
                    list.push(roster.entry_id);
                }
            });
        }

        Self { size, map }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Distinct combinations indexed
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entry ids containing the exact combination, if any entry does
    pub fn entries_for(&self, key: &[PlayerId]) -> Option<&[EntryId]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComboKey, &Vec<EntryId>)> {
        self.map.iter()
    }
}

/// Full-roster index keyed by the whole sorted lineup.
///
/// Duplicate-lineup detection is deliberately not the k = L case of the
/// subset enumerator: one key per entry keeps it O(N).
pub struct LineupIndex {
    map: HashMap<ComboKey, Vec<EntryId>>,
}

impl LineupIndex {
    pub fn build(rosters: &[ResolvedRoster]) -> Self {
        let mut map: HashMap<ComboKey, Vec<EntryId>> = HashMap::new();
        for roster in rosters {
            if roster.players.is_empty() {
                continue;
            }
            let list = map.entry(roster.players.clone()).or_default();
            if list.last() != Some(&roster.entry_id) {
                list.push(roster.entry_id);
            }
        }
        Self { map }
    }

    /// Lineups submitted by more than one entry
    pub fn duplicates(&self) -> impl Iterator<Item = (&ComboKey, &Vec<EntryId>)> {
        self.map.iter().filter(|(_, ids)| ids.len() >= 2)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComboKey, &Vec<EntryId>)> {
        self.map.iter()
    }
}

fn emit_subsets(
    ids: &[PlayerId],
    remaining: usize,
    start: usize,
    scratch: &mut Vec<PlayerId>,
    emit: &mut impl FnMut(&[PlayerId]),
) {
    if remaining == 0 {
        emit(scratch);
        return;
    }
    // Last start index that still leaves enough ids to fill the subset.
    let last_start = ids.len() - remaining;
    for i in start..=last_start {
        scratch.push(ids[i]);
        emit_subsets(ids, remaining - 1, i + 1, scratch, emit);
        scratch.pop();
    }
}
