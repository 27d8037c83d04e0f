//! Error types.
//!
//! Malformed input records never produce errors: projection recovers with
//! defaults. Errors are reserved for commit dispatch, unparseable task ids
//! coming back from the renderer, and configuration loading.

use thiserror::Error;

/// Error type for the scheduling board.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A batch update capability rejected a commit.
    #[error("Update error: {0}")]
    Update(String),

    /// A task id emitted by the renderer matches neither id shape.
    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for scheduling errors.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

impl ScheduleError {
    /// Create an update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update(msg.into())
    }

    /// Create an invalid task id error
    pub fn invalid_task_id(id: impl Into<String>) -> Self {
        Self::InvalidTaskId(id.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScheduleError::update("HTTP 500");
        assert_eq!(err.to_string(), "Update error: HTTP 500");

        let err = ScheduleError::invalid_task_id("wo-x");
        assert_eq!(err.to_string(), "Invalid task id: wo-x");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ScheduleError = json_err.into();
        assert!(matches!(err, ScheduleError::Config(_)));
    }
}
