//! Store port for task persistence and per-owner position maintenance.

use crate::tasklist::domain::{NewTask, OwnerId, Position, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every mutating method executes its whole read-modify-write sequence as
/// one atomic unit scoped to the task's owner: two mutations against the
/// same owner never interleave, while mutations against different owners
/// proceed in parallel. Partial application is never observable; a method
/// that fails has changed nothing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns the owner's active tasks ordered by rank ascending.
    ///
    /// Soft-deleted tasks never appear.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] when the store cannot be
    /// reached.
    async fn list_active(&self, owner: OwnerId) -> TaskStoreResult<Vec<Task>>;

    /// Stores a new task at the tail of its owner's active list.
    ///
    /// The rank is computed inside the atomic section as one past the
    /// owner's greatest active rank, or the head rank for an empty list.
    /// No existing task is renumbered.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateId`] when a task with the same
    /// identifier already exists, signalling an allocator contract breach.
    async fn insert(&self, new_task: NewTask) -> TaskStoreResult<Task>;

    /// Applies a field patch to the task with the given owner and
    /// identifier, stamping `now` as its mutation timestamp.
    ///
    /// Ranks are untouched, including the patched task's own.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no task matches the
    /// owner and identifier.
    async fn update_fields(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task>;

    /// Soft-deletes the task with the given owner and identifier and
    /// renumbers the surviving active tasks to a dense `1..=N`, all in one
    /// atomic unit. Deleting a tombstone refreshes its timestamp only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no task matches the
    /// owner and identifier.
    async fn soft_delete(
        &self,
        owner: OwnerId,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task>;

    /// Moves an active task to a new rank, sliding the contiguous block
    /// between its old and new rank by one to keep the active ranks
    /// exactly `1..=N`. Moving a task onto its current rank shifts
    /// nothing. Only the moved task's mutation timestamp is refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no active task matches
    /// the owner and identifier, or
    /// [`TaskStoreError::PositionOutOfRange`] when the requested rank
    /// exceeds the owner's active count.
    async fn move_to_position(
        &self,
        owner: OwnerId,
        id: TaskId,
        new_position: Position,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// No task matches the owner and identifier.
    #[error("task {id} not found for owner {owner}")]
    NotFound {
        /// Owner whose list was searched.
        owner: OwnerId,
        /// Identifier that did not match.
        id: TaskId,
    },

    /// The requested rank lies outside the owner's active list.
    #[error("position {requested} is outside the active range 1..={len}")]
    PositionOutOfRange {
        /// Rank that was requested.
        requested: Position,
        /// Count of the owner's active tasks.
        len: u32,
    },

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateId(TaskId),

    /// A conflicting concurrent write was detected mid-operation. The
    /// operation has not been applied; callers retry it whole.
    #[error("conflicting concurrent write detected")]
    Conflict,

    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a store-access error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskStoreError {
    fn from(err: diesel::result::Error) -> Self {
        // A serialization failure means a conflicting writer; everything
        // else is surfaced as store unavailability. Unique violations are
        // mapped to semantic errors at the call sites that can name the
        // offending identifier.
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => Self::Conflict,
            other => Self::unavailable(other),
        }
    }
}
