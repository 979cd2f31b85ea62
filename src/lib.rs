//! Faena: Bounded-Concurrency Batch Execution
//!
//! Part of the PAIML Sovereign AI Stack.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use faena::prelude::*;
//!
//! // Re-exports from sub-crates for convenience
//! ```

pub use faena_core as core;

/// Prelude module for common imports.
pub mod prelude {
    pub use faena_core::{
        MetricsSnapshot, QueueConfig, QueueError, QueueMetrics, TaskFailure, TaskId, TaskOutcome,
        TaskQueue, WorkItem,
    };
}
