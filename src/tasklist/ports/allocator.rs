//! Identity allocator port for global task identifier issuance.

use crate::tasklist::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity allocator operations.
pub type IdAllocatorResult<T> = Result<T, IdAllocatorError>;

/// Global task identifier issuance contract.
///
/// Identifiers are strictly greater than every identifier ever issued,
/// across all owners. Implementations must make the read-increment step
/// atomically visible to concurrent callers: two concurrent calls must
/// never observe the same value. On failure the caller must not retry
/// with a re-derived value that could collide.
#[async_trait]
pub trait IdAllocator: Send + Sync {
    /// Issues the next task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdAllocatorError::Unavailable`] when the backing counter
    /// cannot be reached, or [`IdAllocatorError::Exhausted`] when the
    /// identifier space has run out.
    async fn next_id(&self) -> IdAllocatorResult<TaskId>;
}

/// Errors returned by identity allocator implementations.
#[derive(Debug, Clone, Error)]
pub enum IdAllocatorError {
    /// The backing counter could not be reached.
    #[error("identifier counter unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The identifier space has been exhausted.
    #[error("identifier space exhausted")]
    Exhausted,
}

impl IdAllocatorError {
    /// Wraps a counter-access error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
