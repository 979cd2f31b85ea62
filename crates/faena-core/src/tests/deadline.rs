//! Deadline composition: distinct error, preserved partial results, and a
//! queue that stays usable after cancellation.

use std::time::Duration;

use crate::queue::TaskQueue;
use crate::types::WorkItem;

#[tokio::test]
async fn test_deadline_surfaces_as_distinct_error() {
    let mut queue = TaskQueue::<u32>::new(2).unwrap();
    let items = vec![WorkItem::new("glacial", async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok::<_, String>(1u32)
    })];

    let err = queue
        .process_all_within(items, Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(err.is_deadline());
    assert!(err.to_string().contains("deadline"));
}

#[tokio::test]
async fn test_deadline_preserves_completed_prefix() {
    // Gate of one: the fast item completes, then the slow one is cut off.
    let mut queue = TaskQueue::new(1).unwrap();
    let items = vec![
        WorkItem::new("fast", async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, String>(1u32)
        }),
        WorkItem::new("slow", async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, String>(2u32)
        }),
    ];

    let err = queue
        .process_all_within(items, Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(err.is_deadline());

    let partial = queue.results().await;
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].task_id().as_str(), "fast");
    assert!(partial[0].succeeded());
    assert_eq!(partial[0].result(), Some(&1));
}

#[tokio::test]
async fn test_queue_usable_after_cancelled_batch() {
    let mut queue = TaskQueue::new(1).unwrap();

    let err = queue
        .process_all_within(
            vec![WorkItem::new("stuck", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, String>(0u32)
            })],
            Duration::from_millis(30),
        )
        .await
        .unwrap_err();
    assert!(err.is_deadline());

    // A fresh gate and results collection: the next batch runs to
    // completion with nothing leaked from the cancelled one.
    let outcomes = queue
        .process_all(vec![
            WorkItem::new("after-1", async { Ok::<_, String>(1u32) }),
            WorkItem::new("after-2", async { Ok::<_, String>(2u32) }),
        ])
        .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.succeeded()));
    assert_eq!(queue.metrics().in_flight(), 0);
}

#[tokio::test]
async fn test_generous_deadline_is_not_reported() {
    let mut queue = TaskQueue::new(2).unwrap();
    let items = vec![WorkItem::new("brisk", async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, String>("done".to_string())
    })];

    let outcomes = queue
        .process_all_within(items, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].succeeded());
}

#[tokio::test]
async fn test_per_item_failure_is_not_a_deadline() {
    // A failing item inside the window: the wrapper returns Ok, and the
    // failure stays where it belongs, in the outcome.
    let mut queue = TaskQueue::<u32>::new(2).unwrap();
    let items = vec![WorkItem::new("broken", async {
        Err::<u32, _>("application failure".to_string())
    })];

    let outcomes = queue
        .process_all_within(items, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].succeeded());
}
