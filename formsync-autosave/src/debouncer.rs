//! Trailing-edge debounce of form snapshots.

use formsync_types::FormSnapshot;
use std::time::Duration;
use tokio::time::Instant;

/// Holds the latest snapshot until the form has been quiet long enough.
///
/// Every push restarts the quiet period. Nothing is emitted on the leading
/// edge, and nothing is emitted after [`ChangeDebouncer::cancel`].
#[derive(Debug)]
pub struct ChangeDebouncer {
    quiet_period: Duration,
    pending: Option<FormSnapshot>,
    deadline: Option<Instant>,
}

impl ChangeDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Records an edit made at `now`, replacing any pending snapshot.
    pub fn push(&mut self, snapshot: FormSnapshot, now: Instant) {
        self.pending = Some(snapshot);
        self.deadline = Some(now + self.quiet_period);
    }

    /// When the pending snapshot becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emits the pending snapshot if the quiet period has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<FormSnapshot> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drops the pending emission. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline = None;
        self.pending.take().is_some()
    }
}
