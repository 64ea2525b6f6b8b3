//! # Analysis Configuration
//!
//! Configuration for index construction and query limits.

use serde::{Deserialize, Serialize};

/// Configuration for the field analysis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Smallest combination size to index
    pub min_combo_size: usize,
    /// Largest combination size to index (kept small by design; the
    /// per-entry cost is C(roster, k))
    pub max_combo_size: usize,
    /// Minimum same-team/same-game tally that counts as a stack
    pub min_stack_tally: usize,
    /// Upper bound applied to any top-N request
    pub top_n_cap: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { min_combo_size: 2, max_combo_size: 4, min_stack_tally: 2, top_n_cap: 5000 }
    }
}

impl AnalysisConfig {
    /// Clamp the configuration to usable bounds.
    ///
    /// Combination sizes below 2 carry no co-occurrence information and
    /// single-player "stacks" are just exposure, so both floors are 2.
    pub fn normalized(mut self) -> Self {
        self.min_combo_size = self.min_combo_size.max(2);
        self.max_combo_size = self.max_combo_size.max(self.min_combo_size);
        self.min_stack_tally = self.min_stack_tally.max(2);
        self.top_n_cap = self.top_n_cap.max(1);
        self
    }
}
