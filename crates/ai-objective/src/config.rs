//! Scheduler constants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Upper bound for an objective's stored priority.
pub const MAX_PRIORITY: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Priority forced onto the pinned order objective while it is pinned.
    pub order_priority: f32,

    /// Devotion used by behaviors that don't declare their own.
    pub base_devotion: f32,

    /// Seconds before devotion starts accumulating. Counts down every manager tick.
    pub initial_wait_seconds: f32,

    /// Report swallowed logic errors and pruning notices through `tracing`.
    pub verbose_diagnostics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            order_priority: 70.0,
            base_devotion: 5.0,
            initial_wait_seconds: 0.0,
            verbose_diagnostics: false,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_PRIORITY).contains(&self.order_priority) {
            return Err(ConfigError::OrderPriorityOutOfRange(self.order_priority));
        }
        if !self.base_devotion.is_finite() || self.base_devotion < 0.0 {
            return Err(ConfigError::InvalidDevotion(self.base_devotion));
        }
        if !self.initial_wait_seconds.is_finite() || self.initial_wait_seconds < 0.0 {
            return Err(ConfigError::InvalidWait(self.initial_wait_seconds));
        }
        Ok(())
    }

    pub fn with_verbose_diagnostics(mut self, verbose: bool) -> Self {
        self.verbose_diagnostics = verbose;
        self
    }
}
