//! `PostgreSQL` adapters for task list persistence.

mod allocator;
mod models;
mod schema;
mod store;

pub use allocator::PostgresIdAllocator;
pub use store::{PostgresTaskStore, TaskPgPool, new_pool};
