//! # Query Engine
//!
//! Answers exposure/combination/stack queries against the immutable
//! indices, restricted to the current filter window. Window changes
//! swap an immutable snapshot behind a lock; every query runs against
//! one consistent generation.

use crate::error::Result;
use crate::filter::{FilterWindow, ResolvedWindow, WindowSnapshot};
use crate::stacks::StackBy;
use crate::ContestAnalysis;
use contest_registry::{EntryId, PlayerId};
use parking_lot::RwLock;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Resolved window bounds plus "N of total" feedback for presentation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WindowState {
    pub window: ResolvedWindow,
    pub active_entries: usize,
    pub total_entries: usize,
}

/// One combination under the current window
#[derive(Debug, Clone, Serialize)]
pub struct ComboRow {
    /// Sorted player display names
    pub players: Vec<String>,
    /// Canonical label, names joined with " | "
    pub label: String,
    pub size: usize,
    pub effective_count: usize,
    /// Contributing entries restricted to the window
    pub entry_ids: Vec<EntryId>,
}

/// One player's ownership under the current window
#[derive(Debug, Clone, Serialize)]
pub struct ExposureRow {
    pub player_id: PlayerId,
    pub name: String,
    pub effective_count: usize,
    /// Share of active entries rostering the player, 0..=100
    pub exposure_pct: f64,
}

/// One user's ownership of one player under the current window,
/// compared against the field
#[derive(Debug, Clone, Serialize)]
pub struct UserExposureRow {
    pub username: String,
    pub player_id: PlayerId,
    pub name: String,
    /// The user's active entries rostering the player
    pub effective_count: usize,
    /// Share of the user's active entries rostering the player, 0..=100
    pub user_exposure_pct: f64,
    /// Share of all active entries rostering the player, 0..=100
    pub field_pct: f64,
    /// `user_exposure_pct - field_pct`: positive means overweight
    pub delta_vs_field: f64,
}

/// One (group, tally) stack under the current window
#[derive(Debug, Clone, Serialize)]
pub struct StackRow {
    pub group: String,
    pub tally: u8,
    pub effective_count: usize,
}

/// One duplicated lineup under the current window
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRow {
    pub label: String,
    pub effective_count: usize,
    pub entry_ids: Vec<EntryId>,
}

/// Query layer over a built [`ContestAnalysis`].
///
/// The analysis is immutable and shared; the only mutable state is the
/// current window snapshot, replaced wholesale on
/// [`set_window`](QueryEngine::set_window).
pub struct QueryEngine {
    analysis: Arc<ContestAnalysis>,
    snapshot: RwLock<Arc<WindowSnapshot>>,
}

impl QueryEngine {
    /// Create a query engine with the full (unfiltered) window.
    pub fn new(analysis: Arc<ContestAnalysis>) -> Self {
        let snapshot =
            Arc::new(WindowSnapshot::new(analysis.table_arc(), FilterWindow::Full));
        Self { analysis, snapshot: RwLock::new(snapshot) }
    }

    /// Replace the current window atomically and return the resolved
    /// bounds (with clamping feedback). The previous active-set cache
    /// dies with the old snapshot; the new one is built lazily on the
    /// next query.
    pub fn set_window(&self, window: FilterWindow) -> ResolvedWindow {
        let snapshot = Arc::new(WindowSnapshot::new(self.analysis.table_arc(), window));
        let resolved = snapshot.resolved();
        tracing::debug!(
            lo = resolved.lo,
            hi = resolved.hi,
            clamped = resolved.clamped,
            "filter window replaced"
        );
        *self.snapshot.write() = snapshot;
        resolved
    }

    /// Current snapshot; hold it to query one consistent generation.
    pub fn snapshot(&self) -> Arc<WindowSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn analysis(&self) -> &ContestAnalysis {
        &self.analysis
    }

    pub fn window_state(&self) -> WindowState {
        let snapshot = self.snapshot();
        WindowState {
            window: snapshot.resolved(),
            active_entries: snapshot.active_count(),
            total_entries: self.analysis.table().total_entries(),
        }
    }

    /// Effective count for one combination key (player ids, any order).
    pub fn combo_count(&self, players: &[PlayerId]) -> Result<usize> {
        let mut key = players.to_vec();
        key.sort_unstable();
        key.dedup();
        let index = self.analysis.combo_index(key.len())?;
        Ok(index
            .entries_for(&key)
            .map(|ids| self.snapshot().effective_count(ids))
            .unwrap_or(0))
    }

    /// Effective count for one player.
    pub fn player_count(&self, player_id: PlayerId) -> usize {
        self.analysis
            .exposure()
            .entries_for(player_id)
            .map(|ids| self.snapshot().effective_count(ids))
            .unwrap_or(0)
    }

    /// Effective count for one stack key.
    pub fn stack_count(&self, group_by: StackBy, value: &str, tally: u8) -> usize {
        self.analysis
            .stacks(group_by)
            .entries_for(value, tally)
            .map(|ids| self.snapshot().effective_count(ids))
            .unwrap_or(0)
    }

    /// Top combinations of the given size under the current window,
    /// best-first, ties broken by canonical label.
    pub fn top_combos(&self, size: usize, n: usize) -> Result<Vec<ComboRow>> {
        let index = self.analysis.combo_index(size)?;
        let snapshot = self.snapshot();
        let selected = select_top(
            index.iter().filter_map(|(key, ids)| {
                let count = snapshot.effective_count(ids);
                (count > 0).then(|| (self.combo_label(key), count, ids))
            }),
            self.cap(n),
        );
        Ok(selected
            .into_iter()
            .map(|(label, count, ids)| ComboRow {
                players: label.split(" | ").map(str::to_string).collect(),
                label,
                size,
                effective_count: count,
                entry_ids: snapshot.restrict(ids),
            })
            .collect())
    }

    /// Player exposure under the current window, best-first, ties
    /// broken by display name.
    pub fn top_exposure(&self, n: usize) -> Vec<ExposureRow> {
        let snapshot = self.snapshot();
        let active = snapshot.active_count();
        let selected = select_top(
            self.analysis.exposure().iter().filter_map(|(player_id, ids)| {
                let count = snapshot.effective_count(ids);
                (count > 0).then(|| (self.player_name(player_id), count, player_id))
            }),
            self.cap(n),
        );
        selected
            .into_iter()
            .map(|(name, count, player_id)| ExposureRow {
                player_id,
                name,
                effective_count: count,
                exposure_pct: count as f64 / active as f64 * 100.0,
            })
            .collect()
    }

    /// Per-user exposure under the current window, best-first by the
    /// user's entry count, optionally restricted to one username.
    ///
    /// Both percentages restrict to the window the same way: the user's
    /// share is against their own active entries, the field share
    /// against all active entries, and the delta is the difference.
    pub fn top_user_exposure(&self, username: Option<&str>, n: usize) -> Vec<UserExposureRow> {
        let snapshot = self.snapshot();
        let active = snapshot.active_count();
        let index = self.analysis.user_exposure();
        let selected = select_top(
            index
                .iter()
                .filter(|((user, _), _)| username.is_none_or(|u| u == user.as_str()))
                .filter_map(|((user, player_id), ids)| {
                    let count = snapshot.effective_count(ids);
                    (count > 0).then(|| {
                        let label = format!("{user} | {}", self.player_name(*player_id));
                        (label, count, (user, *player_id))
                    })
                }),
            self.cap(n),
        );
        selected
            .into_iter()
            .map(|(_, count, (user, player_id))| {
                let user_active = index
                    .user_entries(user)
                    .map(|ids| snapshot.effective_count(ids))
                    .unwrap_or(0);
                let field_count = self
                    .analysis
                    .exposure()
                    .entries_for(player_id)
                    .map(|ids| snapshot.effective_count(ids))
                    .unwrap_or(0);
                // count > 0 implies the user and field denominators are
                // both nonzero.
                let user_exposure_pct = count as f64 / user_active as f64 * 100.0;
                let field_pct = field_count as f64 / active as f64 * 100.0;
                UserExposureRow {
                    username: user.clone(),
                    player_id,
                    name: self.player_name(player_id),
                    effective_count: count,
                    user_exposure_pct,
                    field_pct,
                    delta_vs_field: user_exposure_pct - field_pct,
                }
            })
            .collect()
    }

    /// Top stacks for the grouping attribute under the current window.
    pub fn top_stacks(&self, group_by: StackBy, n: usize) -> Vec<StackRow> {
        let snapshot = self.snapshot();
        let selected = select_top(
            self.analysis.stacks(group_by).iter().filter_map(|((value, tally), ids)| {
                let count = snapshot.effective_count(ids);
                // Zero-padded tally keeps label ties ordered numerically.
                (count > 0)
                    .then(|| (format!("{value} x{tally:02}"), count, (value, *tally)))
            }),
            self.cap(n),
        );
        selected
            .into_iter()
            .map(|(_, count, (value, tally))| StackRow {
                group: value.clone(),
                tally,
                effective_count: count,
            })
            .collect()
    }

    /// Duplicated lineups (2+ identical rosters inside the window),
    /// best-first.
    pub fn top_duplicates(&self, n: usize) -> Vec<DuplicateRow> {
        let snapshot = self.snapshot();
        let selected = select_top(
            self.analysis.lineups().duplicates().filter_map(|(key, ids)| {
                let count = snapshot.effective_count(ids);
                (count >= 2).then(|| (self.combo_label(key), count, ids))
            }),
            self.cap(n),
        );
        selected
            .into_iter()
            .map(|(label, count, ids)| DuplicateRow {
                label,
                effective_count: count,
                entry_ids: snapshot.restrict(ids),
            })
            .collect()
    }

    fn cap(&self, n: usize) -> usize {
        n.min(self.analysis.config().top_n_cap)
    }

    fn player_name(&self, player_id: PlayerId) -> String {
        self.analysis
            .table()
            .player_name(player_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("player#{player_id}"))
    }

    /// Canonical label: sorted display names joined with " | ".
    fn combo_label(&self, key: &[PlayerId]) -> String {
        let mut names: Vec<String> = key.iter().map(|&id| self.player_name(id)).collect();
        names.sort();
        names.join(" | ")
    }
}

/// Heap entry for bounded selection: effective count descending, then
/// canonical label ascending.
struct Ranked<T> {
    count: usize,
    label: String,
    payload: T,
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.label == other.label
    }
}
impl<T> Eq for Ranked<T> {}
impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Greater = better: higher count, then lexicographically
        // smaller label. Reproducible across repeated calls.
        self.count.cmp(&other.count).then_with(|| other.label.cmp(&self.label))
    }
}

/// Bounded top-N selection: a size-n min-heap instead of a full sort of
/// every key. Returns best-first.
fn select_top<T>(
    candidates: impl Iterator<Item = (String, usize, T)>,
    n: usize,
) -> Vec<(String, usize, T)> {
    if n == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Ranked<T>>> = BinaryHeap::with_capacity(n + 1);
    for (label, count, payload) in candidates {
        heap.push(Reverse(Ranked { count, label, payload }));
        if heap.len() > n {
            heap.pop();
        }
    }
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(r)| (r.label, r.count, r.payload))
        .collect()
}
