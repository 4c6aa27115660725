//! Process-local identity allocator backed by an atomic counter.

use crate::tasklist::domain::TaskId;
use crate::tasklist::ports::{IdAllocator, IdAllocatorError, IdAllocatorResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

/// Identity allocator issuing identifiers from an in-process counter.
///
/// The counter is the single source of issued identifiers, so values are
/// strictly increasing and never reused for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SerialIdAllocator {
    high_water: AtomicI64,
}

impl SerialIdAllocator {
    /// Creates an allocator whose first issued identifier is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            high_water: AtomicI64::new(0),
        }
    }

    /// Creates an allocator resuming after a previously issued
    /// identifier, for embedders rehydrating from a snapshot.
    #[must_use]
    pub const fn resuming_after(last_issued: TaskId) -> Self {
        Self {
            high_water: AtomicI64::new(last_issued.into_inner()),
        }
    }
}

#[async_trait]
impl IdAllocator for SerialIdAllocator {
    async fn next_id(&self) -> IdAllocatorResult<TaskId> {
        // fetch_add is the single atomically-visible read-increment step;
        // concurrent callers each observe a distinct previous value.
        let previous = self.high_water.fetch_add(1, Ordering::SeqCst);
        let issued = previous.checked_add(1).ok_or(IdAllocatorError::Exhausted)?;
        Ok(TaskId::new(issued))
    }
}
