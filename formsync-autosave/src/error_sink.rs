//! Captures save failures without stopping the pipeline.

use crate::error::SaveError;
use crate::state::PipelineState;
use formsync_types::EntityId;
use tracing::warn;

/// Routes failed saves into the pipeline state.
///
/// No retry is attempted: the next edit schedules the next save, and that
/// save's attempt clears the stored error.
#[derive(Debug, Default)]
pub struct ErrorSink {
    failures: u64,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `error` for display and clears `saving`.
    pub fn record(&mut self, state: &mut PipelineState, entity_id: EntityId, error: SaveError) {
        self.failures += 1;
        warn!("Autosave of entity {} failed: {}", entity_id, error);
        state.finish_saving();
        state.error = Some(error);
    }

    /// Forgets the stored error at the start of a save attempt.
    pub fn clear(&self, state: &mut PipelineState) {
        state.error = None;
    }

    /// Failures recorded since the pipeline started.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}
