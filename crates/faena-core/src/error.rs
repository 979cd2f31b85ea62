//! Error types for faena-core.
//!
//! Only queue-level conditions surface here. Failures raised by individual
//! work items are captured into their [`crate::types::TaskOutcome`] and
//! never cross the batch boundary as errors.

use std::time::Duration;

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Error type for batch queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Invalid queue configuration, rejected before any batch is accepted.
    #[error("configuration error: {0}")]
    Config(String),

    /// A batch did not finish before the caller-imposed deadline.
    ///
    /// Outcomes recorded before the deadline remain readable; in-flight
    /// operations were cancelled at their suspension points.
    #[error("batch deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

impl QueueError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if this error is a batch deadline expiry.
    #[must_use]
    pub const fn is_deadline(&self) -> bool {
        matches!(self, Self::DeadlineExceeded(_))
    }
}
