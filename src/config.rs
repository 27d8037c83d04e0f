//! Board configuration.
//!
//! All settings have defaults, so an empty JSON object (or no file at all)
//! yields the standard board: an 08:00–17:00 fallback shift, a 400 ms
//! debounce window and whole-cycle restore on commit failure.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::WorkingWindow;

/// Default quiet period before pending edits are committed (ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Default capacity of the commit event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// What to put back into the pending set when a commit cycle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Any failure restores every edit of the cycle, including edits whose
    /// batch was already accepted. The first failing batch stops the cycle.
    #[default]
    WholeCycle,
    /// Both batches are attempted; only edits of rejected batches return.
    FailedOnly,
}

/// Settings for task projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Shift used for records without planned dates.
    pub working_window: WorkingWindow,
}

/// Settings for the batch-reschedule coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Quiet period after the last edit before committing.
    pub debounce_ms: u64,
    pub restore_policy: RestorePolicy,
    /// Buffered commit events per subscriber.
    pub event_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            restore_policy: RestorePolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CoordinatorConfig {
    /// The debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Sets the debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Sets the restore policy.
    pub fn with_restore_policy(mut self, policy: RestorePolicy) -> Self {
        self.restore_policy = policy;
        self
    }
}

/// Top-level board configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
    pub projection: ProjectionConfig,
    pub coordinator: CoordinatorConfig,
}

impl GanttConfig {
    /// Loads a configuration from JSON, filling unspecified fields with
    /// defaults, and validates it.
    pub fn from_json_str(json: &str) -> ScheduleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that would make the board misbehave.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !self.projection.working_window.is_well_formed() {
            return Err(ScheduleError::config(
                "working_window.start must be before working_window.end",
            ));
        }
        if self.coordinator.debounce_ms == 0 {
            return Err(ScheduleError::config("debounce_ms must be positive"));
        }
        if self.coordinator.event_capacity == 0 {
            return Err(ScheduleError::config("event_capacity must be positive"));
        }
        Ok(())
    }
}
