//! Core type definitions for formsync.
//!
//! This crate defines the small, transport-agnostic types shared by the
//! autosave pipeline and the cross-context channel:
//! - Entity identifiers (integer record ids)
//! - Millisecond wall-clock timestamps
//! - Form snapshots and the rich multi-select option shape
//! - The `UpdateAnnouncement` wire message
//!
//! Domain models (candidates, visa checks, etc.) belong to the consuming
//! application, not here.

mod announcement;
mod ids;
mod snapshot;
mod timestamp;

pub use announcement::UpdateAnnouncement;
pub use ids::EntityId;
pub use snapshot::{EnumOption, FormSnapshot};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid entity id: {0}")]
    InvalidEntityId(#[from] std::num::ParseIntError),

    #[error("snapshot must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
