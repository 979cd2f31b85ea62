//! Queue metrics following the RED method (Rate, Errors, Duration).
//!
//! The in-flight gauge and its peak watermark make the concurrency bound
//! observable: the watermark can never exceed the configured gate size.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Queue metrics collection.
///
/// Thread-safe and cheaply cloneable; clones share the same counters.
#[derive(Debug, Clone)]
pub struct QueueMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    // Rate metrics
    tasks_total: AtomicU64,
    batches_total: AtomicU64,

    // Error metrics
    failures_total: AtomicU64,

    // Duration metrics (stored as microseconds for atomic operations)
    duration_sum_us: AtomicU64,
    duration_max_us: AtomicU64,

    // Concurrency gauge
    in_flight: AtomicU64,
    peak_in_flight: AtomicU64,
}

impl QueueMetrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Recording
    // ═══════════════════════════════════════════════════════════════════════════

    /// Marks the start of a batch.
    pub(crate) fn record_batch(&self) {
        self.inner.batches_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks an operation body as executing; the returned guard decrements
    /// the gauge on drop, so a cancelled batch cannot skew it.
    pub(crate) fn begin_task(&self) -> InFlightGuard {
        let now = self.inner.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.peak_in_flight.fetch_max(now, Ordering::Relaxed);
        InFlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Records a completed operation.
    pub(crate) fn record_task(&self, duration: Duration, succeeded: bool) {
        self.inner.tasks_total.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.inner.failures_total.fetch_add(1, Ordering::Relaxed);
        }
        let us = duration.as_micros() as u64;
        self.inner.duration_sum_us.fetch_add(us, Ordering::Relaxed);
        self.inner.duration_max_us.fetch_max(us, Ordering::Relaxed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns total operations completed (success or failure).
    #[must_use]
    pub fn tasks_total(&self) -> u64 {
        self.inner.tasks_total.load(Ordering::Relaxed)
    }

    /// Returns total operations that failed.
    #[must_use]
    pub fn failures_total(&self) -> u64 {
        self.inner.failures_total.load(Ordering::Relaxed)
    }

    /// Returns total batches started.
    #[must_use]
    pub fn batches_total(&self) -> u64 {
        self.inner.batches_total.load(Ordering::Relaxed)
    }

    /// Returns failure rate (failures / tasks).
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        let tasks = self.tasks_total();
        if tasks > 0 {
            self.failures_total() as f64 / tasks as f64
        } else {
            0.0
        }
    }

    /// Returns average operation duration.
    #[must_use]
    pub fn duration_avg(&self) -> Duration {
        let count = self.tasks_total();
        if count > 0 {
            let sum_us = self.inner.duration_sum_us.load(Ordering::Relaxed);
            Duration::from_micros(sum_us / count)
        } else {
            Duration::ZERO
        }
    }

    /// Returns maximum operation duration.
    #[must_use]
    pub fn duration_max(&self) -> Duration {
        Duration::from_micros(self.inner.duration_max_us.load(Ordering::Relaxed))
    }

    /// Returns the number of operation bodies currently executing.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        self.inner.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the highest observed number of simultaneously executing
    /// operation bodies since this collector was created.
    #[must_use]
    pub fn peak_in_flight(&self) -> u64 {
        self.inner.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of current metrics.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_total: self.tasks_total(),
            failures_total: self.failures_total(),
            batches_total: self.batches_total(),
            error_rate: self.error_rate(),
            duration_avg_us: self.duration_avg().as_micros() as u64,
            duration_max_us: self.duration_max().as_micros() as u64,
            peak_in_flight: self.peak_in_flight(),
        }
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight gauge when dropped.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    inner: Arc<MetricsInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Snapshot of queue metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total operations completed.
    pub tasks_total: u64,
    /// Total operations that failed.
    pub failures_total: u64,
    /// Total batches started.
    pub batches_total: u64,
    /// Failure rate (0.0 to 1.0).
    pub error_rate: f64,
    /// Average operation duration in microseconds.
    pub duration_avg_us: u64,
    /// Maximum operation duration in microseconds.
    pub duration_max_us: u64,
    /// Peak simultaneously executing operations.
    pub peak_in_flight: u64,
}
