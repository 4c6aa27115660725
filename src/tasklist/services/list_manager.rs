//! Service layer for ordered task list operations.

use crate::tasklist::domain::{
    LifecycleState, NewTask, OwnerId, Position, Priority, Task, TaskBody, TaskDomainError, TaskId,
    TaskPatch, TaskTitle,
};
use crate::tasklist::ports::{
    IdAllocator, IdAllocatorError, TaskStore, TaskStoreError, TaskStoreResult,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Number of transparent whole-operation retries after a conflicting
/// concurrent write before the failure is surfaced as unavailability.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: OwnerId,
    title: String,
    body: String,
    due_at: DateTime<Utc>,
    priority: Priority,
    assignee: Option<OwnerId>,
    initial_state: Option<LifecycleState>,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(
        owner: OwnerId,
        title: impl Into<String>,
        body: impl Into<String>,
        due_at: DateTime<Utc>,
        priority: Priority,
    ) -> Self {
        Self {
            owner,
            title: title.into(),
            body: body.into(),
            due_at,
            priority,
            assignee: None,
            initial_state: None,
        }
    }

    /// Assigns the work to a user other than the owner.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: OwnerId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Starts the task in a lifecycle state other than draft.
    #[must_use]
    pub const fn with_initial_state(mut self, state: LifecycleState) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// Service-level errors for task list operations.
#[derive(Debug, Error)]
pub enum TaskListError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Identifier allocation failed.
    #[error(transparent)]
    Identity(#[from] IdAllocatorError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task list service operations.
pub type TaskListResult<T> = Result<T, TaskListError>;

/// Ordered task list orchestration service.
///
/// Validates inputs, allocates identifiers, stamps timestamps from the
/// injected clock, and delegates each mutation to the store's per-owner
/// atomic section. Conflicting concurrent writes reported by the store
/// are retried whole a bounded number of times.
pub struct TaskListService<S, A, C>
where
    S: TaskStore,
    A: IdAllocator,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    ids: Arc<A>,
    clock: Arc<C>,
}

impl<S, A, C> Clone for TaskListService<S, A, C>
where
    S: TaskStore,
    A: IdAllocator,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ids: Arc::clone(&self.ids),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, A, C> TaskListService<S, A, C>
where
    S: TaskStore,
    A: IdAllocator,
    C: Clock + Send + Sync,
{
    /// Creates a new task list service.
    #[must_use]
    pub const fn new(store: Arc<S>, ids: Arc<A>, clock: Arc<C>) -> Self {
        Self { store, ids, clock }
    }

    /// Returns the owner's active tasks ordered by rank ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Store`] when the store cannot be reached.
    pub async fn list(&self, owner: OwnerId) -> TaskListResult<Vec<Task>> {
        Ok(self.store.list_active(owner).await?)
    }

    /// Creates a task at the tail of the owner's active list.
    ///
    /// Validates the fields, allocates a globally unique identifier, and
    /// persists the task with both timestamps set to now. The assignee
    /// defaults to the owner and the lifecycle state to draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Validation`] for malformed fields,
    /// [`TaskListError::Identity`] when no identifier could be issued,
    /// and [`TaskListError::Store`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskListResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let body = TaskBody::new(request.body)?;
        let state = request.initial_state.unwrap_or(LifecycleState::Draft);
        if !state.is_active() {
            return Err(TaskDomainError::ReservedDeletedState.into());
        }

        let id = self.ids.next_id().await?;
        let timestamp = self.clock.utc();
        let new_task = NewTask {
            id,
            owner: request.owner,
            assignee: request.assignee.unwrap_or(request.owner),
            title,
            body,
            due_at: request.due_at,
            priority: request.priority,
            state,
            created_at: timestamp,
            updated_at: timestamp,
        };

        let task = retry_conflicts("create", || self.store.insert(new_task.clone())).await?;
        tracing::debug!(
            owner = %task.owner(),
            id = %task.id(),
            position = %task.position(),
            "task created",
        );
        Ok(task)
    }

    /// Applies field changes to a task, leaving every rank untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Store`] with
    /// [`TaskStoreError::NotFound`] when no task matches the owner and
    /// identifier.
    pub async fn edit(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskListResult<Task> {
        let now = self.clock.utc();
        let task =
            retry_conflicts("edit", || self.store.update_fields(owner, id, patch.clone(), now))
                .await?;
        tracing::debug!(%owner, %id, "task fields updated");
        Ok(task)
    }

    /// Soft-deletes a task and renumbers the owner's surviving active
    /// tasks to close the gap.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Store`] with
    /// [`TaskStoreError::NotFound`] when no task matches the owner and
    /// identifier.
    pub async fn soft_delete(&self, owner: OwnerId, id: TaskId) -> TaskListResult<Task> {
        let now = self.clock.utc();
        let task = retry_conflicts("soft_delete", || self.store.soft_delete(owner, id, now))
            .await?;
        tracing::debug!(%owner, %id, "task soft-deleted");
        Ok(task)
    }

    /// Moves an active task to a new rank, sliding only the contiguous
    /// block between its old and new rank.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Store`] with
    /// [`TaskStoreError::NotFound`] when no active task matches the
    /// owner and identifier, or [`TaskStoreError::PositionOutOfRange`]
    /// when the target rank exceeds the owner's active count.
    pub async fn reorder(
        &self,
        owner: OwnerId,
        id: TaskId,
        new_position: Position,
    ) -> TaskListResult<()> {
        let now = self.clock.utc();
        retry_conflicts("reorder", || {
            self.store.move_to_position(owner, id, new_position, now)
        })
        .await?;
        tracing::debug!(%owner, %id, %new_position, "task reordered");
        Ok(())
    }
}

/// Reruns a store operation after conflicting-write signals, surfacing
/// unavailability once the retry budget is spent.
async fn retry_conflicts<T, F, Fut>(operation: &'static str, mut run: F) -> TaskStoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TaskStoreResult<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match run().await {
            Err(TaskStoreError::Conflict) if attempt < MAX_CONFLICT_RETRIES => {
                attempt += 1;
                tracing::warn!(operation, attempt, "conflicting concurrent write, retrying");
            }
            Err(TaskStoreError::Conflict) => {
                return Err(TaskStoreError::unavailable(std::io::Error::other(
                    "conflict retries exhausted",
                )));
            }
            other => return other,
        }
    }
}
