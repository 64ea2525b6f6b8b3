//! Error types for the contest registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while loading or freezing a contest
#[derive(Error, Debug)]
pub enum RegistryError {
    /// I/O errors reading the contest artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed contest artifact
    #[error("Artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact contained no usable entries
    #[error("Contest has no entries")]
    EmptyContest,

    /// Entry failed structural validation
    #[error("Invalid entry {entry_id}: {reason}")]
    InvalidEntry { entry_id: u64, reason: String },
}
