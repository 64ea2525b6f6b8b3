//! # ContestRegistry
//!
//! Canonical contest data for DFS field analysis: entries, player info,
//! and the frozen contest table the analytics engine queries.
//!
//! Ingestion (CSV parsing, name normalization, salary joins) happens
//! upstream; this crate consumes the canonical JSON artifact that step
//! produces and freezes it into an immutable [`ContestTable`].

pub mod error;
pub mod loader;
pub mod table;
pub mod types;

pub use error::{RegistryError, Result};
pub use loader::{load_contest, ContestArtifact};
pub use table::ContestTable;
pub use types::{ContestMeta, Entry, EntryId, PlayerId, PlayerInfo, Rank};
