//! # User Exposure Summarizer
//!
//! Per-user ownership: how often each user rosters each player across
//! their own entries, for comparison against the field. Percentages and
//! deltas are derived at query time against the active window.

use crate::roster::ResolvedRoster;
use contest_registry::{ContestTable, EntryId, PlayerId};
use std::collections::HashMap;

/// Maps (username, player id) to the user's entries rostering that
/// player, alongside each user's full entry list.
///
/// Single O(N * L) pass, read-only after construction. The per-user
/// entry list is the denominator for user exposure percentages, so both
/// sides of the ratio restrict to the window the same way.
pub struct UserExposureIndex {
    map: HashMap<(String, PlayerId), Vec<EntryId>>,
    user_entries: HashMap<String, Vec<EntryId>>,
}

impl UserExposureIndex {
    pub fn build(table: &ContestTable, rosters: &[ResolvedRoster]) -> Self {
        let mut map: HashMap<(String, PlayerId), Vec<EntryId>> = HashMap::new();
        let mut user_entries: HashMap<String, Vec<EntryId>> = HashMap::new();

        for roster in rosters {
            let Some(entry) = table.entry(roster.entry_id) else { continue };
            let totals = user_entries.entry(entry.username.clone()).or_default();
            if totals.last() != Some(&roster.entry_id) {
                totals.push(roster.entry_id);
            }
            for &player_id in &roster.players {
                let list = map.entry((entry.username.clone(), player_id)).or_default();
                if list.last() != Some(&roster.entry_id) {
                    list.push(roster.entry_id);
                }
            }
        }

        Self { map, user_entries }
    }

    /// Distinct (user, player) pairs indexed
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn entries_for(&self, username: &str, player_id: PlayerId) -> Option<&[EntryId]> {
        self.map.get(&(username.to_string(), player_id)).map(Vec::as_slice)
    }

    /// All entries submitted by one user
    pub fn user_entries(&self, username: &str) -> Option<&[EntryId]> {
        self.user_entries.get(username).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, PlayerId), &Vec<EntryId>)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::resolve_rosters;
    use crate::test_support::{contest, entry_for_user, player};

    #[test]
    fn groups_entries_by_user_and_player() {
        let table = contest(
            vec![
                entry_for_user(1, "shark", 1, &[1, 2]),
                entry_for_user(2, "shark", 2, &[1, 3]),
                entry_for_user(3, "casual", 3, &[2, 3]),
            ],
            vec![player(1, "A", "BOS"), player(2, "B", "BOS"), player(3, "C", "NYK")],
        );
        let (rosters, _) = resolve_rosters(&table);
        let index = UserExposureIndex::build(&table, &rosters);

        assert_eq!(index.entries_for("shark", 1), Some(&[1u64, 2][..]));
        assert_eq!(index.entries_for("shark", 2), Some(&[1u64][..]));
        assert_eq!(index.entries_for("casual", 3), Some(&[3u64][..]));
        assert_eq!(index.entries_for("casual", 1), None);
        assert_eq!(index.user_entries("shark"), Some(&[1u64, 2][..]));
        assert_eq!(index.user_entries("nobody"), None);
    }

    #[test]
    fn duplicate_slots_count_once_per_entry() {
        let table = contest(
            vec![entry_for_user(1, "shark", 1, &[1, 1])],
            vec![player(1, "A", "BOS")],
        );
        let (rosters, _) = resolve_rosters(&table);
        let index = UserExposureIndex::build(&table, &rosters);
        assert_eq!(index.entries_for("shark", 1), Some(&[1u64][..]));
    }
}
