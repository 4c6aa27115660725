//! Reorder behaviour: block shifts, boundaries, and rejection.

use super::helpers::{assert_dense, memory_service, pos, seed_tasks, titles};
use rstest::rstest;
use taskrank::tasklist::domain::OwnerId;
use taskrank::tasklist::ports::TaskStoreError;
use taskrank::tasklist::services::TaskListError;

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

#[rstest]
#[case(4, 2, &["A", "D", "B", "C", "E"])]
#[case(2, 4, &["A", "C", "D", "B", "E"])]
#[case(5, 1, &["E", "A", "B", "C", "D"])]
#[case(1, 5, &["B", "C", "D", "E", "A"])]
#[case(3, 3, &["A", "B", "C", "D", "E"])]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_task_shifts_exactly_the_block_between_the_ranks(
    #[case] from: u32,
    #[case] to: u32,
    #[case] expected: &[&str],
) {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &FIVE).await;
    let index = usize::try_from(from - 1).expect("rank fits usize");
    let target = created.get(index).expect("five tasks created");

    service
        .reorder(owner, target.id(), pos(to))
        .await
        .expect("reorder should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), expected);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_noop_reorder_changes_no_ranks() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &FIVE).await;
    let third = created.get(2).expect("five tasks created");
    let before = service.list(owner).await.expect("listing should succeed");

    service
        .reorder(owner, third.id(), pos(3))
        .await
        .expect("reorder should succeed");

    let after = service.list(owner).await.expect("listing should succeed");
    let before_ids: Vec<_> = before.iter().map(|task| (task.id(), task.position())).collect();
    let after_ids: Vec<_> = after.iter().map(|task| (task.id(), task.position())).collect();
    assert_eq!(before_ids, after_ids);
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_reorders_keep_ranks_dense() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &FIVE).await;

    for (index, to) in [(0_usize, 5_u32), (2, 1), (4, 3), (1, 4)] {
        let target = created.get(index).expect("five tasks created");
        service
            .reorder(owner, target.id(), pos(to))
            .await
            .expect("reorder should succeed");
        let listed = service.list(owner).await.expect("listing should succeed");
        assert_dense(&listed);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn reorder_rejects_ranks_past_the_active_tail() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let head = created.first().expect("three tasks created");

    let result = service.reorder(owner, head.id(), pos(4)).await;

    assert!(matches!(
        result,
        Err(TaskListError::Store(TaskStoreError::PositionOutOfRange {
            len: 3,
            ..
        }))
    ));
    // Rejection applies nothing.
    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["A", "B", "C"]);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn reorder_is_scoped_to_the_owner() {
    let service = memory_service();
    let owner = OwnerId::new();
    let stranger = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B"]).await;
    let head = created.first().expect("two tasks created");
    seed_tasks(&service, stranger, &["X"]).await;

    let result = service.reorder(stranger, head.id(), pos(1)).await;

    assert!(matches!(
        result,
        Err(TaskListError::Store(TaskStoreError::NotFound { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn the_active_range_shrinks_with_soft_deletes() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let tail = created.get(2).expect("three tasks created");
    service
        .soft_delete(owner, tail.id())
        .await
        .expect("soft delete should succeed");

    // Rank 3 no longer exists; the reorder must be rejected.
    let head = created.first().expect("three tasks created");
    let result = service.reorder(owner, head.id(), pos(3)).await;

    assert!(matches!(
        result,
        Err(TaskListError::Store(TaskStoreError::PositionOutOfRange {
            len: 2,
            ..
        }))
    ));
}
