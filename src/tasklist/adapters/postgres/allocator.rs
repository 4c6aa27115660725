//! `PostgreSQL` identity allocator backed by a durable high-water mark.

use super::schema::id_high_water;
use super::store::TaskPgPool;
use crate::tasklist::domain::TaskId;
use crate::tasklist::ports::{IdAllocator, IdAllocatorError, IdAllocatorResult};
use async_trait::async_trait;

use diesel::prelude::*;

/// Identity allocator issuing identifiers from a single-row counter table.
///
/// Allocation is one `UPDATE … RETURNING` statement, so the
/// read-increment step is atomic at the database and concurrent callers
/// across processes never observe the same value.
#[derive(Debug, Clone)]
pub struct PostgresIdAllocator {
    pool: TaskPgPool,
}

impl PostgresIdAllocator {
    /// Creates a new allocator from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdAllocator for PostgresIdAllocator {
    async fn next_id(&self) -> IdAllocatorResult<TaskId> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IdAllocatorError::unavailable)?;
            let issued: i64 = diesel::update(id_high_water::table)
                .set(id_high_water::last_id.eq(id_high_water::last_id + 1))
                .returning(id_high_water::last_id)
                .get_result(&mut connection)
                .map_err(IdAllocatorError::unavailable)?;
            Ok(TaskId::new(issued))
        })
        .await
        .map_err(IdAllocatorError::unavailable)?
    }
}
