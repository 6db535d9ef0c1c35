//! Autosave configuration.

use std::time::Duration;

/// Default quiet period after the last edit before a save fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Configuration for an autosave controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Inactivity required before the latest snapshot is saved.
    pub quiet_period: Duration,
}

impl AutosaveConfig {
    /// Sets the quiet period.
    #[must_use]
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}
