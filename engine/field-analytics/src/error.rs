//! Error types for the analytics engine

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while querying the analysis
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Requested a combination size that was not indexed at build time
    #[error("Combination size {requested} not indexed (configured range {min}..={max})")]
    ComboSizeNotIndexed { requested: usize, min: usize, max: usize },

    /// Contest could not be loaded or frozen
    #[error("Registry error: {0}")]
    Registry(#[from] contest_registry::RegistryError),
}
