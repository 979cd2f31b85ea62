//! Bounded-concurrency batch dispatcher.
//!
//! # Toyota Way: Heijunka (平準化)
//! Level workload processing: at most `max_concurrent` operations execute
//! at any instant, regardless of batch size.
//!
//! # Toyota Way: Jidoka (自働化)
//! Fail-isolated aggregation: one item's failure is captured into its own
//! outcome and never aborts or perturbs its siblings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;

use crate::config::QueueConfig;
use crate::error::{QueueError, Result};
use crate::metrics::QueueMetrics;
use crate::types::{TaskOutcome, WorkItem};

/// Bounded-concurrency task queue.
///
/// A queue accepts batches of independent [`WorkItem`]s, runs at most
/// `max_concurrent` of them simultaneously on the calling task, and
/// records one [`TaskOutcome`] per item in completion order. Callers
/// branch on [`TaskOutcome::succeeded`] to distinguish results from
/// failures; per-item failures are data, not errors.
///
/// Batch operations take `&mut self`, so two batches can never overlap on
/// one queue. [`results`](Self::results) stays shared so the recorded
/// prefix of a cancelled batch remains inspectable.
///
/// # Example
///
/// ```rust,ignore
/// use faena_core::{TaskQueue, WorkItem};
///
/// let mut queue = TaskQueue::new(2)?;
/// let outcomes = queue
///     .process_all(vec![
///         WorkItem::new("alpha", async { Ok::<_, String>("done") }),
///         WorkItem::new("beta", async { Err::<&str, _>("boom".to_string()) }),
///     ])
///     .await;
/// assert_eq!(outcomes.iter().filter(|o| o.succeeded()).count(), 1);
/// ```
pub struct TaskQueue<T> {
    /// Validated configuration.
    config: QueueConfig,
    /// Cumulative metrics across batches.
    metrics: QueueMetrics,
    /// Outcomes of the current batch, in completion order.
    results: Mutex<Vec<TaskOutcome<T>>>,
}

impl<T: Clone> TaskQueue<T> {
    /// Creates a queue with the given concurrency bound.
    ///
    /// # Errors
    /// Returns `QueueError::Config` if `max_concurrent` is zero. The gate
    /// must have at least one permit before any batch is accepted.
    pub fn new(max_concurrent: usize) -> Result<Self> {
        Self::with_config(QueueConfig::new().with_max_concurrent(max_concurrent))
    }

    /// Creates a queue from a full configuration.
    ///
    /// # Errors
    /// Returns `QueueError::Config` if the configuration is invalid.
    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: QueueMetrics::new(),
            results: Mutex::new(Vec::new()),
        })
    }

    /// Returns the concurrency bound.
    #[must_use]
    pub const fn max_concurrent(&self) -> usize {
        self.config.max_concurrent
    }

    /// Returns the queue configuration.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Returns the queue metrics.
    #[must_use]
    pub const fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    /// Returns the outcomes recorded so far, in completion order.
    ///
    /// After a completed batch this equals the batch's return value; after
    /// a deadline expiry it holds the prefix recorded before cancellation.
    pub async fn results(&self) -> Vec<TaskOutcome<T>> {
        self.results.lock().await.clone()
    }

    /// Runs a single work item to completion and records its outcome.
    ///
    /// Records start and completion times regardless of how the operation
    /// ends, captures the return value or the failure into the outcome,
    /// and appends it to the queue's results. A failing operation never
    /// propagates an error past this call; panics are programming defects
    /// and do propagate.
    pub async fn process_one(&self, item: WorkItem<T>) -> TaskOutcome<T> {
        let (id, operation) = item.into_parts();
        tracing::debug!(task_id = %id, "task started");

        let in_flight = self.metrics.begin_task();
        let started_at = Instant::now();
        let result = operation.await;
        let completed_at = Instant::now();
        drop(in_flight);

        let outcome = match result {
            Ok(value) => {
                let outcome = TaskOutcome::success(id, value, started_at, completed_at);
                tracing::debug!(
                    task_id = %outcome.task_id(),
                    duration = ?outcome.duration(),
                    "task completed"
                );
                outcome
            }
            Err(error) => {
                tracing::warn!(task_id = %id, error = %error, "task failed");
                TaskOutcome::failure(id, error, started_at, completed_at)
            }
        };
        self.metrics.record_task(outcome.duration(), outcome.succeeded());

        self.results.lock().await.push(outcome.clone());
        outcome
    }

    /// Runs a whole batch under the concurrency gate.
    ///
    /// Every item is submitted eagerly; execution is bounded by a gate
    /// created fresh for this invocation, so permits never carry over
    /// between batches. The call suspends until all items have finished
    /// and returns exactly one outcome per input item, in completion
    /// order. An empty batch returns immediately without suspending.
    ///
    /// Submission order does not determine start order once the batch
    /// exceeds the gate size, and completion order is non-deterministic
    /// for items of near-equal duration.
    pub async fn process_all(&mut self, items: Vec<WorkItem<T>>) -> Vec<TaskOutcome<T>> {
        if items.is_empty() {
            return Vec::new();
        }

        let total = items.len();
        tracing::info!(
            tasks = total,
            max_concurrent = self.config.max_concurrent,
            "batch started"
        );
        self.metrics.record_batch();
        self.results.get_mut().clear();

        let gate = Arc::new(Semaphore::new(self.config.max_concurrent));
        let this: &Self = self;

        let guarded = items.into_iter().map(|item| {
            let gate = Arc::clone(&gate);
            async move {
                // The gate is never closed, so acquisition only completes
                // once a permit frees up; tokio grants permits in FIFO
                // order among waiters. The permit is released on drop,
                // including when the batch future is cancelled mid-flight.
                let _permit = gate.acquire().await.ok();
                this.process_one(item).await;
            }
        });
        join_all(guarded).await;

        let outcomes = self.results.lock().await.clone();
        tracing::info!(
            tasks = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.succeeded()).count(),
            "batch finished"
        );
        outcomes
    }

    /// Runs a batch under a caller-imposed deadline.
    ///
    /// The queue itself never times work out; this composes
    /// [`process_all`](Self::process_all) with a deadline from the
    /// runtime. On expiry, in-flight operations are cancelled at their
    /// suspension points, no new operations start, permits are released,
    /// and outcomes recorded before the deadline remain readable via
    /// [`results`](Self::results).
    ///
    /// # Errors
    /// Returns `QueueError::DeadlineExceeded` if the batch does not finish
    /// within `limit`. Individual item failures never surface as errors,
    /// so the two conditions are always distinguishable.
    pub async fn process_all_within(
        &mut self,
        items: Vec<WorkItem<T>>,
        limit: Duration,
    ) -> Result<Vec<TaskOutcome<T>>> {
        match timeout(limit, self.process_all(items)).await {
            Ok(outcomes) => Ok(outcomes),
            Err(_) => {
                tracing::warn!(limit = ?limit, "batch deadline exceeded");
                Err(QueueError::DeadlineExceeded(limit))
            }
        }
    }

    /// Runs a batch, applying the configured `batch_timeout` when present.
    ///
    /// # Errors
    /// Returns `QueueError::DeadlineExceeded` if a configured deadline
    /// expires before the batch finishes.
    pub async fn process_batch(&mut self, items: Vec<WorkItem<T>>) -> Result<Vec<TaskOutcome<T>>> {
        match self.config.batch_timeout {
            Some(limit) => self.process_all_within(items, limit).await,
            None => Ok(self.process_all(items).await),
        }
    }
}

impl<T> std::fmt::Debug for TaskQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
