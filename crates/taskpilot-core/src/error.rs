//! Error types for the scheduling pipeline.

use thiserror::Error;

/// Main error type for schedule operations.
///
/// Extraction problems are deliberately absent: a response without a usable
/// structured block degrades to an empty schedule instead of failing (see
/// [`crate::extract`]).
#[derive(Error, Debug, Clone)]
pub enum ScheduleError {
    /// The request was rejected before any external call.
    #[error("{message}")]
    InvalidRequest { message: String },

    /// The generative-model call itself failed (network, auth, quota).
    #[error("Model call failed: {message}")]
    Transport { message: String },

    /// A scheduled entry named a task that does not exist. Only raised in
    /// strict reconciliation mode; the lenient default skips instead.
    #[error("Scheduled task \"{task_name}\" does not match any known task")]
    UnknownTask { task_name: String },

    /// Document store failure.
    #[error("Store error: {message}")]
    Store { message: String },
}

impl ScheduleError {
    /// Returns true if retrying the whole request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::Transport { .. })
    }
}

/// Convenience Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
