//! Core types for batch task processing.
//!
//! Identifiers are caller-assigned (unique within a batch, used only for
//! outcome correlation), work items are consumed exactly once, and an
//! outcome is a result-or-error union so both sides can never be populated.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Boxed failure produced by a work item's operation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-erased future for a work item's operation.
pub type OperationFuture<T> = BoxFuture<'static, std::result::Result<T, BoxError>>;

/// Caller-assigned identifier for a work item.
///
/// Unique within a batch; the queue copies it into the matching
/// [`TaskOutcome`] and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of submitted asynchronous work.
///
/// The operation is a zero-argument future; callers bind arguments via
/// closure capture before construction. A work item is immutable once
/// built and consumed exactly once by the dispatcher.
pub struct WorkItem<T> {
    id: TaskId,
    operation: OperationFuture<T>,
}

impl<T> WorkItem<T> {
    /// Creates a work item from an identifier and an operation future.
    ///
    /// The operation signals expected failure through its `Err` side; any
    /// error type convertible into [`BoxError`] works, including `String`.
    #[must_use]
    pub fn new<F, E>(id: impl Into<TaskId>, operation: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            id: id.into(),
            operation: Box::pin(async move {
                operation.await.map_err(|error| -> BoxError { error.into() })
            }),
        }
    }

    /// Returns the item's identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Splits the item into its identifier and operation.
    pub(crate) fn into_parts(self) -> (TaskId, OperationFuture<T>) {
        (self.id, self.operation)
    }
}

impl<T> fmt::Debug for WorkItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Captured failure from a work item's operation.
///
/// Cheaply cloneable so an outcome can be both stored by the queue and
/// returned to the caller without requiring the operation's error type to
/// be `Clone`.
#[derive(Debug, Clone)]
pub struct TaskFailure(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl TaskFailure {
    pub(crate) fn new(error: BoxError) -> Self {
        Self(Arc::from(error))
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TaskFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Recorded result and timing for one work item.
///
/// Exactly one of the success value and the failure is populated; the
/// union is enforced by the internal `Result` rather than by convention.
/// Outcomes are appended to a batch's results in completion order and
/// never mutated afterward.
#[derive(Debug, Clone)]
pub struct TaskOutcome<T> {
    task_id: TaskId,
    outcome: std::result::Result<T, TaskFailure>,
    started_at: Instant,
    completed_at: Instant,
    duration: Duration,
}

impl<T> TaskOutcome<T> {
    pub(crate) fn success(task_id: TaskId, value: T, started_at: Instant, completed_at: Instant) -> Self {
        Self {
            task_id,
            outcome: Ok(value),
            started_at,
            completed_at,
            duration: completed_at.duration_since(started_at),
        }
    }

    pub(crate) fn failure(task_id: TaskId, error: BoxError, started_at: Instant, completed_at: Instant) -> Self {
        Self {
            task_id,
            outcome: Err(TaskFailure::new(error)),
            started_at,
            completed_at,
            duration: completed_at.duration_since(started_at),
        }
    }

    /// Returns the identifier of the originating work item.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns true if the operation completed without failure.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the success value, if the operation succeeded.
    #[must_use]
    pub fn result(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// Returns the captured failure, if the operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&TaskFailure> {
        self.outcome.as_ref().err()
    }

    /// Returns when execution of this item started.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns when execution of this item completed.
    #[must_use]
    pub const fn completed_at(&self) -> Instant {
        self.completed_at
    }

    /// Returns how long the operation ran. Always non-negative.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Converts the outcome into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<T, TaskFailure> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instants() -> (Instant, Instant) {
        let started = Instant::now();
        let completed = started + Duration::from_millis(25);
        (started, completed)
    }

    #[test]
    fn test_task_id_display() {
        let id = TaskId::new("fetch-user");
        assert_eq!(id.to_string(), "fetch-user");
        assert_eq!(id.as_str(), "fetch-user");
    }

    #[test]
    fn test_task_id_conversions() {
        let from_str: TaskId = "a".into();
        let from_string: TaskId = String::from("a").into();
        assert_eq!(from_str, from_string);
    }

    #[test]
    fn test_task_id_serialize_roundtrip() {
        let id = TaskId::new("task-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"task-7\"");
        let deserialized: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_work_item_id_and_debug() {
        let item = WorkItem::new("t1", async { Ok::<_, String>(1u32) });
        assert_eq!(item.id().as_str(), "t1");
        let debug = format!("{item:?}");
        assert!(debug.contains("t1"));
    }

    #[tokio::test]
    async fn test_work_item_consumed_once() {
        let item = WorkItem::new("t1", async { Ok::<_, String>(41u32 + 1) });
        let (id, operation) = item.into_parts();
        assert_eq!(id.as_str(), "t1");
        assert_eq!(operation.await.unwrap(), 42);
    }

    #[test]
    fn test_outcome_success_side() {
        let (started, completed) = instants();
        let outcome = TaskOutcome::success(TaskId::new("t1"), 7u32, started, completed);
        assert!(outcome.succeeded());
        assert_eq!(outcome.result(), Some(&7));
        assert!(outcome.error().is_none());
        assert_eq!(outcome.duration(), Duration::from_millis(25));
    }

    #[test]
    fn test_outcome_failure_side() {
        let (started, completed) = instants();
        let error: BoxError = "connection refused".to_string().into();
        let outcome: TaskOutcome<u32> = TaskOutcome::failure(TaskId::new("t2"), error, started, completed);
        assert!(!outcome.succeeded());
        assert!(outcome.result().is_none());
        let failure = outcome.error().unwrap();
        assert_eq!(failure.to_string(), "connection refused");
        assert_eq!(failure.message(), "connection refused");
    }

    #[test]
    fn test_outcome_timing_invariants() {
        let (started, completed) = instants();
        let outcome = TaskOutcome::success(TaskId::new("t1"), (), started, completed);
        assert!(outcome.completed_at() >= outcome.started_at());
        assert_eq!(outcome.duration(), outcome.completed_at().duration_since(outcome.started_at()));
    }

    #[test]
    fn test_outcome_into_result() {
        let (started, completed) = instants();
        let ok = TaskOutcome::success(TaskId::new("t1"), "v".to_string(), started, completed);
        assert_eq!(ok.into_result().unwrap(), "v");

        let error: BoxError = "bad".to_string().into();
        let failed: TaskOutcome<String> = TaskOutcome::failure(TaskId::new("t2"), error, started, completed);
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_failure_clone_shares_error() {
        let (started, completed) = instants();
        let error: BoxError = "boom".to_string().into();
        let outcome: TaskOutcome<u32> = TaskOutcome::failure(TaskId::new("t1"), error, started, completed);
        let cloned = outcome.clone();
        assert_eq!(
            outcome.error().map(TaskFailure::message),
            cloned.error().map(TaskFailure::message)
        );
    }

    #[test]
    fn test_failure_source_preserved() {
        let (started, completed) = instants();
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let error: BoxError = Box::new(io);
        let outcome: TaskOutcome<u32> = TaskOutcome::failure(TaskId::new("t1"), error, started, completed);
        let failure = outcome.error().unwrap();
        assert!(failure.to_string().contains("timed out"));
    }
}
