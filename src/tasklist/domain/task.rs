//! Task aggregate root and related lifecycle types.

use super::{
    OwnerId, ParseLifecycleStateError, ParsePriorityError, Position, TaskBody, TaskDomainError,
    TaskId, TaskTitle,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority, ordered from least to most pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default priority.
    Medium,
    /// Should be picked up soon.
    High,
    /// Needs attention now.
    Urgent,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Task lifecycle state.
///
/// [`LifecycleState::Deleted`] is a soft-delete tombstone: the record stays
/// in the store but leaves the owner's active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Task has been created but work has not started.
    Draft,
    /// Task is being worked on.
    InProgress,
    /// Task work is temporarily paused.
    OnHold,
    /// Task has been completed.
    Completed,
    /// Task has been soft-deleted.
    Deleted,
}

impl LifecycleState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }

    /// Returns `true` unless this is the soft-delete tombstone state.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Deleted)
    }
}

impl TryFrom<&str> for LifecycleState {
    type Error = ParseLifecycleStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "in_progress" => Ok(Self::InProgress),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseLifecycleStateError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// A task always carries a position; the only way to obtain one is through
/// [`NewTask::into_task`], which adapters call inside their per-owner
/// atomic section, or [`Task::from_persisted`] for rows read back from
/// storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    assignee: OwnerId,
    title: TaskTitle,
    body: TaskBody,
    due_at: DateTime<Utc>,
    priority: Priority,
    state: LifecycleState,
    position: Position,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fully validated and timestamped task data awaiting a position.
///
/// Built by the list manager after validation and identifier allocation;
/// the position is assigned by the store inside the owner's atomic section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Allocator-issued identifier.
    pub id: TaskId,
    /// Owner of the list the task joins.
    pub owner: OwnerId,
    /// User responsible for the work.
    pub assignee: OwnerId,
    /// Validated title.
    pub title: TaskTitle,
    /// Validated body.
    pub body: TaskBody,
    /// Due timestamp.
    pub due_at: DateTime<Utc>,
    /// Priority.
    pub priority: Priority,
    /// Initial lifecycle state; never [`LifecycleState::Deleted`].
    pub state: LifecycleState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp; equals `created_at` at birth.
    pub updated_at: DateTime<Utc>,
}

impl NewTask {
    /// Completes the task with the rank assigned by the store.
    #[must_use]
    pub fn into_task(self, position: Position) -> Task {
        Task {
            id: self.id,
            owner: self.owner,
            assignee: self.assignee,
            title: self.title,
            body: self.body,
            due_at: self.due_at,
            priority: self.priority,
            state: self.state,
            position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner: OwnerId,
    /// Persisted assignee identifier.
    pub assignee: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted body.
    pub body: TaskBody,
    /// Persisted due timestamp.
    pub due_at: DateTime<Utc>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle state.
    pub state: LifecycleState,
    /// Persisted rank; stale when the state is the tombstone.
    pub position: Position,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            assignee: data.assignee,
            title: data.title,
            body: data.body,
            due_at: data.due_at,
            priority: data.priority,
            state: data.state,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owner of the list this task belongs to.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the user responsible for the work.
    #[must_use]
    pub const fn assignee(&self) -> OwnerId {
        self.assignee
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task body.
    #[must_use]
    pub const fn body(&self) -> &TaskBody {
        &self.body
    }

    /// Returns the due timestamp.
    #[must_use]
    pub const fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the rank within the owner's active list.
    ///
    /// The value is stale once the task has been soft-deleted.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task counts toward its owner's active list.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Applies a field patch and refreshes the mutation timestamp.
    ///
    /// Identity, ownership, and rank are untouched; rank changes only move
    /// through the reorder operation.
    pub fn apply_patch(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(body) = &patch.body {
            self.body = body.clone();
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        self.updated_at = now;
    }

    /// Marks the task as soft-deleted and refreshes the mutation timestamp.
    ///
    /// Deleting an already-deleted task refreshes the timestamp only.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.state = LifecycleState::Deleted;
        self.updated_at = now;
    }

    /// Moves the task to a new rank as the target of a reorder,
    /// refreshing the mutation timestamp.
    pub fn moved_to(&mut self, position: Position, now: DateTime<Utc>) {
        self.position = position;
        self.updated_at = now;
    }

    /// Re-ranks the task as a side effect of another task's move or
    /// removal. Position maintenance is not a user edit, so the mutation
    /// timestamp is left alone.
    pub fn displaced_to(&mut self, position: Position) {
        self.position = position;
    }
}

/// Field changes applied by the edit operation.
///
/// Absent fields are left untouched. Identity, ownership, and rank are not
/// representable here; the tombstone state is rejected at construction so
/// deletion cannot bypass the renumbering soft-delete path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<TaskTitle>,
    body: Option<TaskBody>,
    due_at: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    assignee: Option<OwnerId>,
    state: Option<LifecycleState>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: None,
            body: None,
            due_at: None,
            priority: None,
            assignee: None,
            state: None,
        }
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets a new body.
    #[must_use]
    pub fn with_body(mut self, body: TaskBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a new due timestamp.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Reassigns the task to another user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: OwnerId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets a new lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ReservedDeletedState`] for
    /// [`LifecycleState::Deleted`]; soft deletion is its own operation.
    pub fn with_state(mut self, state: LifecycleState) -> Result<Self, TaskDomainError> {
        if matches!(state, LifecycleState::Deleted) {
            return Err(TaskDomainError::ReservedDeletedState);
        }
        self.state = Some(state);
        Ok(self)
    }
}
