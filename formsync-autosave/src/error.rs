//! Error types for the autosave layer.

use thiserror::Error;

/// Result type for controller operations.
pub type AutosaveResult<T> = Result<T, AutosaveError>;

/// Failure reported by a save operation.
///
/// Stored in the pipeline state for display; a failed save never stops the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The backend refused the update.
    #[error("save rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// Timeout.
    #[error("save timed out")]
    Timeout,

    /// Anything else the save operation wants to surface.
    #[error("{0}")]
    Other(String),
}

impl SaveError {
    /// Shorthand for [`SaveError::Other`].
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Shorthand for [`SaveError::Rejected`].
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Misuse of the controller lifecycle.
#[derive(Debug, Error)]
pub enum AutosaveError {
    /// `bind_form` has not been called.
    #[error("no form bound to entity {0}")]
    NotBound(formsync_types::EntityId),

    /// `start` already ran for the current binding.
    #[error("autosave already started for entity {0}")]
    AlreadyStarted(formsync_types::EntityId),

    /// `start` requires a tokio runtime.
    #[error("no tokio runtime available to drive autosave")]
    NoRuntime,
}
