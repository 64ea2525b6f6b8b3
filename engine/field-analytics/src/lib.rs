//! # FieldAnalytics
//!
//! Aggregation and incremental-refiltering engine for DFS contest
//! results: player exposure, combination co-occurrence, team/game
//! stacks, and duplicate-lineup detection across the whole field.
//!
//! All indices are built once per contest load from the frozen
//! [`ContestTable`] and are read-only thereafter. Filter changes never
//! re-enumerate combinations; the query layer intersects precomputed
//! per-key entry-id lists with the active window instead.

pub mod cli;
pub mod combo;
pub mod config;
pub mod error;
pub mod exposure;
pub mod filter;
pub mod query;
pub mod roster;
pub mod stacks;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for easy usage
pub use combo::{ComboIndex, ComboKey, LineupIndex};
pub use config::AnalysisConfig;
pub use error::{AnalyticsError, Result};
pub use exposure::ExposureIndex;
pub use filter::{FilterWindow, ResolvedWindow, WindowSnapshot};
pub use query::{
    ComboRow, DuplicateRow, ExposureRow, QueryEngine, StackRow, UserExposureRow, WindowState,
};
pub use roster::Diagnostics;
pub use stacks::{StackBy, StackIndex, StackKey};
pub use users::UserExposureIndex;

use contest_registry::ContestTable;
use roster::resolve_rosters;
use std::collections::BTreeMap;
use std::sync::Arc;

/// All indices for one contest, built once and immutable.
///
/// Safe to share across concurrent queries without locking; the only
/// mutable state in the system lives in [`QueryEngine`]'s window
/// snapshot.
pub struct ContestAnalysis {
    table: Arc<ContestTable>,
    config: AnalysisConfig,
    exposure: ExposureIndex,
    user_exposure: UserExposureIndex,
    combos: BTreeMap<usize, ComboIndex>,
    lineups: LineupIndex,
    team_stacks: StackIndex,
    game_stacks: StackIndex,
    diagnostics: Diagnostics,
}

impl ContestAnalysis {
    /// Build every index from the frozen table.
    ///
    /// One roster-resolution pass feeds all builders, so unresolved
    /// player references are counted exactly once.
    pub fn build(table: Arc<ContestTable>, config: AnalysisConfig) -> Self {
        let config = config.normalized();
        let (rosters, diagnostics) = resolve_rosters(&table);

        let exposure = ExposureIndex::build(&rosters);
        let user_exposure = UserExposureIndex::build(&table, &rosters);
        let mut combos = BTreeMap::new();
        for size in config.min_combo_size..=config.max_combo_size {
            combos.insert(size, ComboIndex::build(&rosters, size));
        }
        let lineups = LineupIndex::build(&rosters);
        let team_stacks =
            StackIndex::build(&table, &rosters, StackBy::Team, config.min_stack_tally);
        let game_stacks =
            StackIndex::build(&table, &rosters, StackBy::Game, config.min_stack_tally);

        tracing::info!(
            entries = table.total_entries(),
            players = exposure.len(),
            combo_sizes = ?(config.min_combo_size..=config.max_combo_size),
            team_stacks = team_stacks.len(),
            game_stacks = game_stacks.len(),
            unresolved_refs = diagnostics.unresolved_refs,
            "contest analysis built"
        );

        Self {
            table,
            config,
            exposure,
            user_exposure,
            combos,
            lineups,
            team_stacks,
            game_stacks,
            diagnostics,
        }
    }

    pub fn table(&self) -> &ContestTable {
        &self.table
    }

    pub fn table_arc(&self) -> Arc<ContestTable> {
        self.table.clone()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn exposure(&self) -> &ExposureIndex {
        &self.exposure
    }

    pub fn user_exposure(&self) -> &UserExposureIndex {
        &self.user_exposure
    }

    /// Combination index for size k, if k was indexed at build time.
    pub fn combo_index(&self, size: usize) -> Result<&ComboIndex> {
        self.combos.get(&size).ok_or(AnalyticsError::ComboSizeNotIndexed {
            requested: size,
            min: self.config.min_combo_size,
            max: self.config.max_combo_size,
        })
    }

    /// Indexed combination sizes, ascending.
    pub fn combo_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.combos.keys().copied()
    }

    /// Full-roster index for duplicate-lineup detection.
    pub fn lineups(&self) -> &LineupIndex {
        &self.lineups
    }

    pub fn stacks(&self, group_by: StackBy) -> &StackIndex {
        match group_by {
            StackBy::Team => &self.team_stacks,
            StackBy::Game => &self.game_stacks,
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{contest, entry, player};

    /// Small reference field: entries AB, AB, AC, CD over players A..D.
    fn example() -> Arc<ContestAnalysis> {
        let table = contest(
            vec![
                entry(1, 1, &[1, 2]),
                entry(2, 2, &[1, 2]),
                entry(3, 3, &[1, 3]),
                entry(4, 4, &[3, 4]),
            ],
            vec![
                player(1, "A", "BOS"),
                player(2, "B", "BOS"),
                player(3, "C", "NYK"),
                player(4, "D", "NYK"),
            ],
        );
        Arc::new(ContestAnalysis::build(Arc::new(table), AnalysisConfig::default()))
    }

    #[test]
    fn end_to_end_unfiltered_counts() {
        let engine = QueryEngine::new(example());

        assert_eq!(engine.player_count(1), 3);
        assert_eq!(engine.player_count(2), 2);
        assert_eq!(engine.player_count(3), 2);
        assert_eq!(engine.player_count(4), 1);

        assert_eq!(engine.combo_count(&[1, 2]).unwrap(), 2);
        assert_eq!(engine.combo_count(&[1, 3]).unwrap(), 1);
        assert_eq!(engine.combo_count(&[3, 4]).unwrap(), 1);
        assert_eq!(engine.combo_count(&[2, 4]).unwrap(), 0);
    }

    #[test]
    fn end_to_end_rank_window() {
        let engine = QueryEngine::new(example());
        let resolved = engine.set_window(FilterWindow::RankRange { lo: 1, hi: 2 });
        assert!(!resolved.clamped);

        assert_eq!(engine.combo_count(&[1, 2]).unwrap(), 2);
        assert_eq!(engine.combo_count(&[1, 3]).unwrap(), 0);
        assert_eq!(engine.player_count(1), 2);
        assert_eq!(engine.player_count(4), 0);

        let state = engine.window_state();
        assert_eq!(state.active_entries, 2);
        assert_eq!(state.total_entries, 4);
    }

    #[test]
    fn full_window_counts_equal_stored_list_lengths() {
        let analysis = example();
        let engine = QueryEngine::new(analysis.clone());
        let snapshot = engine.snapshot();

        for size in analysis.combo_sizes() {
            for (_, ids) in analysis.combo_index(size).unwrap().iter() {
                assert_eq!(snapshot.effective_count(ids), ids.len());
            }
        }
        for (_, ids) in analysis.exposure().iter() {
            assert_eq!(snapshot.effective_count(ids), ids.len());
        }
        for (_, ids) in analysis.stacks(StackBy::Team).iter() {
            assert_eq!(snapshot.effective_count(ids), ids.len());
        }
    }

    #[test]
    fn narrowing_never_increases_counts() {
        let analysis = example();
        let engine = QueryEngine::new(analysis.clone());

        let full = engine.snapshot();
        engine.set_window(FilterWindow::RankRange { lo: 1, hi: 2 });
        let narrow = engine.snapshot();

        for (_, ids) in analysis.combo_index(2).unwrap().iter() {
            assert!(narrow.effective_count(ids) <= full.effective_count(ids));
        }
        for (_, ids) in analysis.exposure().iter() {
            assert!(narrow.effective_count(ids) <= full.effective_count(ids));
        }
    }

    #[test]
    fn duplicate_lineups_detected_and_window_sensitive() {
        let engine = QueryEngine::new(example());

        let dupes = engine.top_duplicates(10);
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].label, "A | B");
        assert_eq!(dupes[0].entry_ids, vec![1, 2]);

        // Only one of the two AB entries survives, so nothing is a
        // duplicate inside the window.
        engine.set_window(FilterWindow::RankRange { lo: 2, hi: 4 });
        assert!(engine.top_duplicates(10).is_empty());
    }

    #[test]
    fn top_exposure_reports_share_of_active() {
        let engine = QueryEngine::new(example());
        let rows = engine.top_exposure(10);

        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[0].effective_count, 3);
        assert!((rows[0].exposure_pct - 75.0).abs() < f64::EPSILON);

        // B and C tie at 2; name breaks the tie.
        assert_eq!(rows[1].name, "B");
        assert_eq!(rows[2].name, "C");
        assert_eq!(rows[3].name, "D");
    }

    #[test]
    fn top_combos_orders_and_restricts_entry_ids() {
        let engine = QueryEngine::new(example());
        engine.set_window(FilterWindow::TopPercentile(0.75));

        let rows = engine.top_combos(2, 10).unwrap();
        assert_eq!(rows[0].label, "A | B");
        assert_eq!(rows[0].effective_count, 2);
        assert_eq!(rows[0].entry_ids, vec![1, 2]);
        // CD fell outside the top-75% window entirely.
        assert!(rows.iter().all(|r| r.label != "C | D"));
    }

    #[test]
    fn unindexed_combo_size_is_an_error() {
        let engine = QueryEngine::new(example());
        assert!(matches!(
            engine.top_combos(7, 5),
            Err(AnalyticsError::ComboSizeNotIndexed { requested: 7, min: 2, max: 4 })
        ));
    }

    #[test]
    fn stacks_report_under_window() {
        let engine = QueryEngine::new(example());
        let rows = engine.top_stacks(StackBy::Team, 10);

        // AB and AB are two BOS-2 lineups; CD is one NYK-2 lineup.
        assert_eq!(rows[0].group, "BOS");
        assert_eq!(rows[0].tally, 2);
        assert_eq!(rows[0].effective_count, 2);
        assert_eq!(rows[1].group, "NYK");
        assert_eq!(rows[1].effective_count, 1);

        engine.set_window(FilterWindow::RankRange { lo: 4, hi: 4 });
        let rows = engine.top_stacks(StackBy::Team, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group, "NYK");
    }

    #[test]
    fn user_exposure_compares_against_the_field() {
        use crate::test_support::entry_for_user;

        // shark rosters A in both entries; the field plays A in 3 of 4.
        let table = contest(
            vec![
                entry_for_user(1, "shark", 1, &[1, 2]),
                entry_for_user(2, "shark", 2, &[1, 3]),
                entry_for_user(3, "casual", 3, &[1, 4]),
                entry_for_user(4, "casual", 4, &[3, 4]),
            ],
            vec![
                player(1, "A", "BOS"),
                player(2, "B", "BOS"),
                player(3, "C", "NYK"),
                player(4, "D", "NYK"),
            ],
        );
        let analysis =
            Arc::new(ContestAnalysis::build(Arc::new(table), AnalysisConfig::default()));
        let engine = QueryEngine::new(analysis);

        let rows = engine.top_user_exposure(Some("shark"), 10);
        assert!(rows.iter().all(|r| r.username == "shark"));

        let a = rows.iter().find(|r| r.name == "A").unwrap();
        assert_eq!(a.effective_count, 2);
        assert!((a.user_exposure_pct - 100.0).abs() < f64::EPSILON);
        assert!((a.field_pct - 75.0).abs() < f64::EPSILON);
        assert!((a.delta_vs_field - 25.0).abs() < f64::EPSILON);

        // Restricting the window restricts both sides of the ratio.
        engine.set_window(FilterWindow::RankRange { lo: 2, hi: 4 });
        let rows = engine.top_user_exposure(None, 10);
        let shark_a = rows
            .iter()
            .find(|r| r.username == "shark" && r.name == "A")
            .unwrap();
        assert_eq!(shark_a.effective_count, 1);
        assert!((shark_a.user_exposure_pct - 100.0).abs() < f64::EPSILON);
        // A appears in 2 of the 3 windowed entries.
        assert!((shark_a.field_pct - (2.0 / 3.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn snapshot_is_consistent_across_window_swap() {
        let engine = QueryEngine::new(example());
        let held = engine.snapshot();
        engine.set_window(FilterWindow::RankRange { lo: 1, hi: 1 });

        // The held generation still sees the full field.
        assert_eq!(held.active_count(), 4);
        assert_eq!(engine.snapshot().active_count(), 1);
    }
}
