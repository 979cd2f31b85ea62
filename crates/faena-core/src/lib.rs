// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # faena-core
//!
//! Bounded-concurrency batch execution primitives for the Faena framework.
//!
//! This crate provides the core types for running batches of independent
//! asynchronous work under a concurrency gate:
//!
//! - [`TaskQueue`] runs at most `max_concurrent` operations at once and
//!   never drops an item
//! - [`WorkItem`] wraps one unit of work; [`TaskOutcome`] records its
//!   success value or captured failure plus timing
//! - [`QueueConfig`] for validated configuration
//! - [`QueueMetrics`] for RED method metrics (Rate, Errors, Duration)
//!
//! ## Iron Lotus Framework
//!
//! This crate follows the Iron Lotus Framework principles:
//! - **Jidoka**: per-item failures are captured, never propagated; queue
//!   errors are explicit, no panics
//! - **Heijunka**: the gate levels workload regardless of batch size
//! - **Kaizen**: continuous metrics for improvement
//!
//! ## Example
//!
//! ```rust,ignore
//! use faena_core::{TaskQueue, WorkItem};
//!
//! let mut queue = TaskQueue::new(2)?;
//! let outcomes = queue
//!     .process_all(vec![
//!         WorkItem::new("alpha", async { Ok::<_, String>(1u32) }),
//!         WorkItem::new("beta", async { Ok::<_, String>(2u32) }),
//!     ])
//!     .await;
//! assert_eq!(outcomes.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Allow significant_drop_tightening - overly aggressive for async code with locks
#![allow(clippy::significant_drop_tightening)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod queue;
#[cfg(test)]
pub mod tests;
pub mod types;

pub use config::QueueConfig;
pub use error::{QueueError, Result};
pub use metrics::{MetricsSnapshot, QueueMetrics};
pub use queue::TaskQueue;
pub use types::{BoxError, OperationFuture, TaskFailure, TaskId, TaskOutcome, WorkItem};
