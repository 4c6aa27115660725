//! In-memory adapters for tests and single-process embedders.
//!
//! These adapters provide thread-safe implementations of the task list
//! ports without database dependencies, honouring the same per-owner
//! atomicity contract as the durable adapters.

mod allocator;
mod store;

pub use allocator::SerialIdAllocator;
pub use store::InMemoryTaskStore;
