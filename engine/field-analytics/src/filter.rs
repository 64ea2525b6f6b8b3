//! # Filter Windows
//!
//! Percentile/rank windows over the field, resolved to concrete rank
//! bounds and snapshotted for lock-free querying.

use contest_registry::{ContestTable, EntryId, Rank};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Analyst-facing filter over the field: the whole contest, an explicit
/// inclusive rank range, or the top fraction of the field by rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterWindow {
    /// No restriction
    Full,
    /// Inclusive rank bounds [lo, hi]
    RankRange { lo: Rank, hi: Rank },
    /// Top fraction p of the field, p in (0, 1]
    TopPercentile(f64),
}

impl FilterWindow {
    /// Resolve to concrete rank bounds against a field of `total`
    /// entries.
    ///
    /// Out-of-range bounds are clamped, never rejected, and the
    /// `clamped` flag reports that back to the caller. Percentiles use
    /// ceiling rounding and always admit at least the top entry for
    /// p > 0, so a smaller p can never produce a larger window.
    pub fn resolve(&self, total: usize) -> ResolvedWindow {
        let total_rank = total as Rank;
        match *self {
            FilterWindow::Full => ResolvedWindow { lo: 1, hi: total_rank, clamped: false },
            FilterWindow::RankRange { lo, hi } => {
                let clamped_lo = lo.clamp(1, total_rank.max(1));
                let clamped_hi = hi.clamp(1, total_rank.max(1));
                ResolvedWindow {
                    lo: clamped_lo,
                    hi: clamped_hi,
                    clamped: clamped_lo != lo || clamped_hi != hi,
                }
            }
            FilterWindow::TopPercentile(p) => {
                let clamped_p = if p.is_finite() { p.clamp(f64::MIN_POSITIVE, 1.0) } else { 1.0 };
                let hi = (clamped_p * total as f64).ceil() as Rank;
                ResolvedWindow {
                    lo: 1,
                    hi: hi.clamp(1, total_rank.max(1)),
                    clamped: clamped_p != p,
                }
            }
        }
    }
}

/// Concrete inclusive rank bounds after resolution.
///
/// `lo > hi` is a valid, empty window (every query just returns zero
/// counts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedWindow {
    pub lo: Rank,
    pub hi: Rank,
    /// True if the requested bounds were out of range and adjusted
    pub clamped: bool,
}

impl ResolvedWindow {
    pub fn contains(&self, rank: Rank) -> bool {
        rank >= self.lo && rank <= self.hi
    }
}

/// One immutable generation of the filter: the resolved bounds plus a
/// lazily built active-entry set.
///
/// Snapshots are replaced wholesale on every window change, so two
/// queries holding the same snapshot always observe consistent results.
pub struct WindowSnapshot {
    table: Arc<ContestTable>,
    window: FilterWindow,
    resolved: ResolvedWindow,
    active: OnceLock<HashSet<EntryId>>,
}

impl WindowSnapshot {
    pub fn new(table: Arc<ContestTable>, window: FilterWindow) -> Self {
        let resolved = window.resolve(table.total_entries());
        Self { table, window, resolved, active: OnceLock::new() }
    }

    pub fn window(&self) -> FilterWindow {
        self.window
    }

    pub fn resolved(&self) -> ResolvedWindow {
        self.resolved
    }

    /// Entry ids whose rank falls inside the window. Computed once per
    /// snapshot on first access.
    pub fn active_entries(&self) -> &HashSet<EntryId> {
        self.active.get_or_init(|| {
            self.table
                .entries()
                .iter()
                .filter(|e| self.resolved.contains(e.rank))
                .map(|e| e.entry_id)
                .collect()
        })
    }

    pub fn active_count(&self) -> usize {
        self.active_entries().len()
    }

    /// Size of the intersection between a stored id list and the active
    /// set. O(ids.len()); never re-derives combinations.
    pub fn effective_count(&self, ids: &[EntryId]) -> usize {
        let active = self.active_entries();
        if active.is_empty() {
            return 0;
        }
        ids.iter().filter(|id| active.contains(id)).count()
    }

    /// Stored ids restricted to the active set, preserving list order.
    pub fn restrict<'a>(&self, ids: &'a [EntryId]) -> Vec<EntryId> {
        let active = self.active_entries();
        ids.iter().copied().filter(|id| active.contains(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{contest, entry, player};

    fn table_of(n: usize) -> Arc<ContestTable> {
        let entries = (1..=n).map(|r| entry(r as u64 + 100, r as Rank, &[1])).collect();
        Arc::new(contest(entries, vec![player(1, "A", "BOS")]))
    }

    #[test]
    fn percentile_uses_ceiling_rounding() {
        assert_eq!(FilterWindow::TopPercentile(0.01).resolve(1000).hi, 10);
        assert_eq!(FilterWindow::TopPercentile(0.01).resolve(150).hi, 2);
        assert_eq!(FilterWindow::TopPercentile(0.015).resolve(1000).hi, 15);
    }

    #[test]
    fn percentile_always_admits_the_top_entry() {
        let resolved = FilterWindow::TopPercentile(0.0001).resolve(10);
        assert_eq!((resolved.lo, resolved.hi), (1, 1));
    }

    #[test]
    fn percentile_is_monotonic() {
        let total = 977;
        let mut last = 0;
        for p in [0.001, 0.01, 0.1, 0.25, 0.5, 1.0] {
            let hi = FilterWindow::TopPercentile(p).resolve(total).hi;
            assert!(hi >= last, "p={p} shrank the window");
            last = hi;
        }
        assert_eq!(last, total as Rank);
    }

    #[test]
    fn out_of_range_bounds_are_clamped_and_reported() {
        let resolved = FilterWindow::RankRange { lo: 0, hi: 500 }.resolve(100);
        assert_eq!((resolved.lo, resolved.hi), (1, 100));
        assert!(resolved.clamped);

        let resolved = FilterWindow::TopPercentile(3.0).resolve(100);
        assert_eq!(resolved.hi, 100);
        assert!(resolved.clamped);

        let resolved = FilterWindow::RankRange { lo: 2, hi: 50 }.resolve(100);
        assert!(!resolved.clamped);
    }

    #[test]
    fn active_set_matches_percentile_bound() {
        let table = table_of(200);
        let snapshot = WindowSnapshot::new(table.clone(), FilterWindow::TopPercentile(0.01));
        assert_eq!(snapshot.active_count(), 2);

        let wider = WindowSnapshot::new(table, FilterWindow::TopPercentile(0.10));
        assert!(snapshot.active_entries().is_subset(wider.active_entries()));
    }

    #[test]
    fn empty_window_counts_zero_for_everything() {
        let table = table_of(10);
        let snapshot =
            WindowSnapshot::new(table, FilterWindow::RankRange { lo: 9, hi: 3 });
        assert_eq!(snapshot.active_count(), 0);
        assert_eq!(snapshot.effective_count(&[101, 102, 103]), 0);
    }

    #[test]
    fn effective_count_intersects_stored_ids() {
        let table = table_of(10);
        let snapshot = WindowSnapshot::new(table, FilterWindow::RankRange { lo: 1, hi: 3 });
        // Entry ids are rank + 100 in the fixture.
        assert_eq!(snapshot.effective_count(&[101, 103, 109]), 2);
        assert_eq!(snapshot.restrict(&[109, 103, 101]), vec![103, 101]);
    }
}
