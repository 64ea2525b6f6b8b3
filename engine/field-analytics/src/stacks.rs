//! # Stack Summarizer
//!
//! Same-team and same-game groupings. Structurally the combination
//! index's sibling, but keyed by a single grouping attribute, so the
//! build is linear with no combinatorial blowup.

use crate::roster::ResolvedRoster;
use contest_registry::{ContestTable, EntryId};
use serde::Serialize;
use std::collections::HashMap;

/// Grouping attribute for stack summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StackBy {
    /// Players sharing a team
    Team,
    /// Players sharing a game (either side)
    Game,
}

/// (grouping attribute value, player tally) - one key per group per
/// entry, e.g. ("BOS", 3) for a lineup with three Celtics.
pub type StackKey = (String, u8);

/// Map from stack key to the deduplicated contributing entries.
///
/// Team and game indices are independent; a lineup may contribute to a
/// team stack and a game stack simultaneously.
pub struct StackIndex {
    group_by: StackBy,
    map: HashMap<StackKey, Vec<EntryId>>,
}

impl StackIndex {
    /// Tally each entry's resolved roster by the grouping attribute and
    /// record one key per group reaching `min_tally` players. Players
    /// whose attribute is unknown are skipped.
    pub fn build(
        table: &ContestTable,
        rosters: &[ResolvedRoster],
        group_by: StackBy,
        min_tally: usize,
    ) -> Self {
        let mut map: HashMap<StackKey, Vec<EntryId>> = HashMap::new();
        let mut tallies: HashMap<&str, u8> = HashMap::new();

        for roster in rosters {
            tallies.clear();
            for &player_id in &roster.players {
                let Some(info) = table.player(player_id) else { continue };
                let attribute = match group_by {
                    StackBy::Team => info.team.as_deref(),
                    StackBy::Game => info.game_id.as_deref(),
                };
                if let Some(value) = attribute {
                    let tally = tallies.entry(value).or_insert(0);
                    *tally = tally.saturating_add(1);
                }
            }
            for (&value, &tally) in &tallies {
                if (tally as usize) < min_tally {
                    continue;
                }
                let list = map.entry((value.to_string(), tally)).or_default();
                // One contribution per key per entry.
                if list.last() != Some(&roster.entry_id) {
                    list.push(roster.entry_id);
                }
            }
        }

        Self { group_by, map }
    }

    pub fn group_by(&self) -> StackBy {
        self.group_by
    }

    /// Distinct (group, tally) keys indexed
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn entries_for(&self, value: &str, tally: u8) -> Option<&[EntryId]> {
        self.map.get(&(value.to_string(), tally)).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StackKey, &Vec<EntryId>)> {
        self.map.iter()
    }
}
