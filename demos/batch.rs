// Examples are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Faena Batch Example
//!
//! Runs a mixed batch of simulated fetches through a bounded-concurrency
//! queue and prints every outcome, failed ones included.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example batch
//!
//! # With task-level logging
//! RUST_LOG=debug cargo run --example batch
//! ```

use std::time::{Duration, Instant};

use faena::prelude::*;

/// Simulated upstream fetch: sleeps, then succeeds or fails.
async fn simulated_fetch(
    resource: &'static str,
    millis: u64,
    fail: bool,
) -> Result<String, String> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    if fail {
        Err(format!("{resource}: upstream returned 503"))
    } else {
        Ok(format!("{resource} payload"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = QueueConfig::new()
        .with_max_concurrent(2)
        .with_batch_timeout(Duration::from_secs(5));
    let mut queue = TaskQueue::with_config(config)?;

    println!("[BATCH] 5 items, 2 permits, 5s deadline");

    let items = vec![
        WorkItem::new("fetch-users", simulated_fetch("users", 120, false)),
        WorkItem::new("fetch-orders", simulated_fetch("orders", 80, false)),
        WorkItem::new("fetch-invoices", simulated_fetch("invoices", 50, true)),
        WorkItem::new("fetch-reports", simulated_fetch("reports", 200, false)),
        WorkItem::new("fetch-events", simulated_fetch("events", 30, false)),
    ];

    let start = Instant::now();
    let outcomes = queue.process_batch(items).await?;
    let elapsed = start.elapsed();

    println!("[BATCH] finished in {:.0?} (completion order):", elapsed);
    for outcome in &outcomes {
        match outcome.result() {
            Some(payload) => println!(
                "[OK]   {:<15} {:>6.0?}  {payload}",
                outcome.task_id().to_string(),
                outcome.duration()
            ),
            None => println!(
                "[FAIL] {:<15} {:>6.0?}  {}",
                outcome.task_id().to_string(),
                outcome.duration(),
                outcome.error().map(|e| e.to_string()).unwrap_or_default()
            ),
        }
    }

    let snapshot = queue.metrics().snapshot();
    println!(
        "[STATS] tasks: {} | failed: {} | peak concurrency: {} | avg: {}us | max: {}us",
        snapshot.tasks_total,
        snapshot.failures_total,
        snapshot.peak_in_flight,
        snapshot.duration_avg_us,
        snapshot.duration_max_us,
    );

    Ok(())
}
