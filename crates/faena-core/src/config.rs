//! Queue configuration.
//!
//! Configuration is validated at queue construction (Poka-Yoke), with
//! sensible defaults and clear error messages. A queue with an invalid
//! configuration never accepts a batch.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, Result};

/// Batch queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of operations executing at any instant. Must be at
    /// least 1.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Deadline applied to whole batches by
    /// [`crate::queue::TaskQueue::process_batch`]. `None` runs unbounded.
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub batch_timeout: Option<Duration>,
}

fn default_max_concurrent() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            batch_timeout: None,
        }
    }
}

impl QueueConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency bound.
    #[must_use]
    pub const fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Sets the batch deadline.
    #[must_use]
    pub const fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = Some(timeout);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the concurrency bound is zero or the batch
    /// timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(QueueError::config("max_concurrent must be at least 1"));
        }
        if let Some(timeout) = self.batch_timeout
            && timeout.is_zero()
        {
            return Err(QueueError::config("batch_timeout must be non-zero"));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed configuration is invalid.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| QueueError::config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| QueueError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
