//! Pipeline state published to the UI.

use crate::error::SaveError;
use std::fmt;

/// What a form's autosave is doing right now.
///
/// `typing` and `saving` are never both set: an edit clears `saving`, and
/// dispatching a save clears `typing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    /// An edit arrived and the quiet period has not elapsed.
    pub typing: bool,
    /// A save is in flight.
    pub saving: bool,
    /// The last save failure, until the next save attempt.
    pub error: Option<SaveError>,
}

impl PipelineState {
    pub(crate) fn begin_typing(&mut self) {
        self.typing = true;
        self.saving = false;
    }

    pub(crate) fn begin_saving(&mut self) {
        self.typing = false;
        self.saving = true;
    }

    pub(crate) fn finish_saving(&mut self) {
        self.saving = false;
    }

    /// Collapses the flags into one displayable status.
    pub fn status(&self) -> AutosaveStatus {
        if self.saving {
            AutosaveStatus::Saving
        } else if self.typing {
            AutosaveStatus::Typing
        } else if let Some(error) = &self.error {
            AutosaveStatus::Failed(error.to_string())
        } else {
            AutosaveStatus::Idle
        }
    }
}

/// Status line shown next to an autosaving form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveStatus {
    /// Nothing pending; everything typed has been saved.
    Idle,
    /// Waiting for the user to pause.
    Typing,
    /// A save is in flight.
    Saving,
    /// The last save failed.
    Failed(String),
}

impl fmt::Display for AutosaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutosaveStatus::Idle => write!(f, "Saved"),
            AutosaveStatus::Typing => write!(f, "Typing..."),
            AutosaveStatus::Saving => write!(f, "Saving..."),
            AutosaveStatus::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}
