//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task body is empty after trimming.
    #[error("task body must not be empty")]
    EmptyBody,

    /// Sequence positions are 1-based; zero is never a valid rank.
    #[error("sequence positions start at 1, got 0")]
    ZeroPosition,

    /// The deleted state is reachable only through the soft-delete
    /// operation, which renumbers the surviving tasks.
    #[error("the deleted state is reserved for soft deletion")]
    ReservedDeletedState,
}

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing lifecycle states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lifecycle state: {0}")]
pub struct ParseLifecycleStateError(pub String);
