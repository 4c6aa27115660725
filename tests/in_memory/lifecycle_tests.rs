//! Full-lifecycle flows: create, edit, soft delete, list.

use super::helpers::{
    assert_dense, memory_service, quick_request, ranks, seed_tasks, titles,
};
use taskrank::tasklist::domain::{
    LifecycleState, OwnerId, Priority, TaskBody, TaskId, TaskPatch, TaskTitle,
};
use taskrank::tasklist::ports::TaskStoreError;
use taskrank::tasklist::services::TaskListError;

#[tokio::test(flavor = "multi_thread")]
async fn listing_an_unknown_owner_is_empty() {
    let service = memory_service();
    let listed = service
        .list(OwnerId::new())
        .await
        .expect("listing should succeed");
    assert!(listed.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_are_isolated_per_owner() {
    let service = memory_service();
    let alice = OwnerId::new();
    let bob = OwnerId::new();

    seed_tasks(&service, alice, &["Alice 1", "Alice 2"]).await;
    seed_tasks(&service, bob, &["Bob 1"]).await;

    let alice_tasks = service.list(alice).await.expect("listing should succeed");
    let bob_tasks = service.list(bob).await.expect("listing should succeed");

    assert_eq!(titles(&alice_tasks), vec!["Alice 1", "Alice 2"]);
    assert_eq!(titles(&bob_tasks), vec!["Bob 1"]);
    // Bob's list starts at rank 1 regardless of Alice's.
    assert_eq!(ranks(&bob_tasks), vec![1]);
}

#[tokio::test(flavor = "multi_thread")]
async fn identifiers_are_unique_across_owners() {
    let service = memory_service();
    let alice = OwnerId::new();
    let bob = OwnerId::new();

    let mut ids = Vec::new();
    for task in seed_tasks(&service, alice, &["A1", "A2"]).await {
        ids.push(task.id());
    }
    for task in seed_tasks(&service, bob, &["B1", "B2"]).await {
        ids.push(task.id());
    }

    let mut deduplicated = ids.clone();
    deduplicated.sort_unstable();
    deduplicated.dedup();
    assert_eq!(deduplicated.len(), ids.len(), "identifiers must be unique");
}

#[tokio::test(flavor = "multi_thread")]
async fn editing_fields_preserves_the_listing_order() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let middle = created.get(1).expect("three tasks created");

    let patch = TaskPatch::new()
        .with_title(TaskTitle::new("B, but urgent").expect("valid title"))
        .with_body(TaskBody::new("now with details").expect("valid body"))
        .with_priority(Priority::Urgent);
    service
        .edit(owner, middle.id(), patch)
        .await
        .expect("edit should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["A", "B, but urgent", "C"]);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn completing_a_task_keeps_it_listed() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["Done soon"]).await;
    let only = created.first().expect("one task created");

    let patch = TaskPatch::new()
        .with_state(LifecycleState::Completed)
        .expect("completed is an active state");
    service
        .edit(owner, only.id(), patch)
        .await
        .expect("edit should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed.first().expect("one task listed").state(),
        LifecycleState::Completed
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_head_renumbers_the_rest() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let head = created.first().expect("three tasks created");

    service
        .soft_delete(owner, head.id())
        .await
        .expect("soft delete should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["B", "C"]);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_tail_needs_no_renumbering() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let tail = created.get(2).expect("three tasks created");

    service
        .soft_delete(owner, tail.id())
        .await
        .expect("soft delete should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["A", "B"]);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn creating_after_a_delete_reuses_the_freed_tail_rank() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["A", "B", "C"]).await;
    let middle = created.get(1).expect("three tasks created");

    service
        .soft_delete(owner, middle.id())
        .await
        .expect("soft delete should succeed");
    seed_tasks(&service, owner, &["D"]).await;

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["A", "C", "D"]);
    assert_dense(&listed);
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_on_missing_tasks_report_not_found() {
    let service = memory_service();
    let owner = OwnerId::new();
    seed_tasks(&service, owner, &["Only"]).await;
    let ghost = TaskId::new(404);

    let edit = service.edit(owner, ghost, TaskPatch::new()).await;
    let delete = service.soft_delete(owner, ghost).await;

    assert!(matches!(
        edit,
        Err(TaskListError::Store(TaskStoreError::NotFound { .. }))
    ));
    assert!(matches!(
        delete,
        Err(TaskListError::Store(TaskStoreError::NotFound { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn a_deleted_task_is_invisible_to_every_read() {
    let service = memory_service();
    let owner = OwnerId::new();
    let created = seed_tasks(&service, owner, &["Ephemeral"]).await;
    let only = created.first().expect("one task created");

    service
        .soft_delete(owner, only.id())
        .await
        .expect("soft delete should succeed");

    let listed = service.list(owner).await.expect("listing should succeed");
    assert!(listed.is_empty());

    // The tombstone is still editable; deletion is soft.
    let patch = TaskPatch::new().with_priority(Priority::Low);
    let edited = service
        .edit(owner, only.id(), patch)
        .await
        .expect("editing a tombstone should succeed");
    assert_eq!(edited.state(), LifecycleState::Deleted);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_validation_failures_leave_the_list_untouched() {
    let service = memory_service();
    let owner = OwnerId::new();
    seed_tasks(&service, owner, &["Sound"]).await;

    let result = service.create(quick_request(owner, "  ")).await;
    assert!(matches!(result, Err(TaskListError::Validation(_))));

    let listed = service.list(owner).await.expect("listing should succeed");
    assert_eq!(titles(&listed), vec!["Sound"]);
    assert_dense(&listed);
}
