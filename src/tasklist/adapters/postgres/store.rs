//! `PostgreSQL` store implementation for ordered task lists.

use super::models::{NewTaskRow, TaskChangeset, TaskRow};
use super::schema::tasks;
use crate::tasklist::domain::{
    BlockShift, LifecycleState, NewTask, OwnerId, PersistedTaskData, Position, Priority, Task,
    TaskBody, TaskId, TaskPatch, TaskTitle, next_position, shift_for_move,
};
use crate::tasklist::ports::{TaskStore, TaskStoreError, TaskStoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task list adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns the pool builder's error when no connection can be
/// established.
pub fn new_pool(database_url: &str) -> Result<TaskPgPool, PoolError> {
    Pool::builder().build(ConnectionManager::new(database_url))
}

/// `PostgreSQL`-backed task store.
///
/// Every mutation runs inside a transaction that first takes an advisory
/// lock keyed on the owner, so same-owner read-modify-write sequences
/// serialise at the database even across processes, and either commit
/// whole or leave no trace.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::unavailable)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn list_active(&self, owner: OwnerId) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows: Vec<TaskRow> = tasks::table
                .filter(tasks::owner.eq(owner.into_inner()))
                .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .load(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn insert(&self, new_task: NewTask) -> TaskStoreResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                lock_owner(txn, new_task.owner)?;
                let max_rank: Option<i32> = tasks::table
                    .filter(tasks::owner.eq(new_task.owner.into_inner()))
                    .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                    .select(diesel::dsl::max(tasks::position))
                    .first(txn)?;
                let current_max = max_rank.map(position_from_db).transpose()?;
                let task = new_task.into_task(next_position(current_max));
                let row = to_new_row(&task)?;
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(txn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskStoreError::DuplicateId(task.id())
                        }
                        other => other.into(),
                    })?;
                Ok(task)
            })
        })
        .await
    }

    async fn update_fields(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                lock_owner(txn, owner)?;
                let found: TaskRow = tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::id.eq(id.into_inner()))
                    .select(TaskRow::as_select())
                    .first(txn)
                    .optional()?
                    .ok_or(TaskStoreError::NotFound { owner, id })?;
                let mut task = row_to_task(found)?;
                task.apply_patch(&patch, now);
                diesel::update(tasks::table.find(id.into_inner()))
                    .set(to_changeset(&task))
                    .execute(txn)?;
                Ok(task)
            })
        })
        .await
    }

    async fn soft_delete(
        &self,
        owner: OwnerId,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                lock_owner(txn, owner)?;
                let found: TaskRow = tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::id.eq(id.into_inner()))
                    .select(TaskRow::as_select())
                    .first(txn)
                    .optional()?
                    .ok_or(TaskStoreError::NotFound { owner, id })?;
                let mut task = row_to_task(found)?;
                let was_active = task.is_active();
                task.mark_deleted(now);
                diesel::update(tasks::table.find(id.into_inner()))
                    .set((
                        tasks::state.eq(LifecycleState::Deleted.as_str()),
                        tasks::updated_at.eq(now),
                    ))
                    .execute(txn)?;
                if was_active {
                    renumber_active(txn, owner)?;
                }
                Ok(task)
            })
        })
        .await
    }

    async fn move_to_position(
        &self,
        owner: OwnerId,
        id: TaskId,
        new_position: Position,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                lock_owner(txn, owner)?;
                let found: TaskRow = tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                    .select(TaskRow::as_select())
                    .first(txn)
                    .optional()?
                    .ok_or(TaskStoreError::NotFound { owner, id })?;
                let old_position = position_from_db(found.position)?;
                let active_count: i64 = tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                    .count()
                    .get_result(txn)?;
                let len = u32::try_from(active_count).map_err(TaskStoreError::unavailable)?;
                if new_position.get() > len {
                    return Err(TaskStoreError::PositionOutOfRange {
                        requested: new_position,
                        len,
                    });
                }
                shift_block(txn, owner, shift_for_move(old_position, new_position))?;
                diesel::update(tasks::table.find(id.into_inner()))
                    .set((
                        tasks::position.eq(position_to_db(new_position)?),
                        tasks::updated_at.eq(now),
                    ))
                    .execute(txn)?;
                Ok(())
            })
        })
        .await
    }
}

/// Serialises same-owner mutations by taking a transaction-scoped
/// advisory lock keyed on the owner identifier.
fn lock_owner(connection: &mut PgConnection, owner: OwnerId) -> TaskStoreResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<diesel::sql_types::BigInt, _>(owner_lock_key(owner))
        .execute(connection)?;
    Ok(())
}

/// Folds the 128-bit owner UUID into the 63-bit advisory lock keyspace.
///
/// Distinct owners may collide on a key; a collision only over-serialises
/// the two lists, it never corrupts them.
fn owner_lock_key(owner: OwnerId) -> i64 {
    let bits = owner.into_inner().as_u128();
    let folded = (bits >> 64) ^ (bits & u128::from(u64::MAX));
    i64::try_from(folded & u128::from(u64::MAX >> 1)).unwrap_or_default()
}

/// Slides the displaced block by one rank inside the current transaction.
fn shift_block(
    txn: &mut PgConnection,
    owner: OwnerId,
    shift: Option<BlockShift>,
) -> TaskStoreResult<()> {
    match shift {
        Some(BlockShift::TowardHead { above, through }) => {
            diesel::update(
                tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                    .filter(tasks::position.gt(position_to_db(above)?))
                    .filter(tasks::position.le(position_to_db(through)?)),
            )
            .set(tasks::position.eq(tasks::position - 1))
            .execute(txn)?;
        }
        Some(BlockShift::TowardTail { from, below }) => {
            diesel::update(
                tasks::table
                    .filter(tasks::owner.eq(owner.into_inner()))
                    .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
                    .filter(tasks::position.ge(position_to_db(from)?))
                    .filter(tasks::position.lt(position_to_db(below)?)),
            )
            .set(tasks::position.eq(tasks::position + 1))
            .execute(txn)?;
        }
        None => {}
    }
    Ok(())
}

/// Rewrites the owner's active ranks to a dense `1..=N` inside the
/// current transaction, touching only rows whose rank is wrong.
fn renumber_active(txn: &mut PgConnection, owner: OwnerId) -> TaskStoreResult<()> {
    let survivors: Vec<(i64, i32)> = tasks::table
        .filter(tasks::owner.eq(owner.into_inner()))
        .filter(tasks::state.ne(LifecycleState::Deleted.as_str()))
        .order(tasks::position.asc())
        .select((tasks::id, tasks::position))
        .load(txn)?;
    for (index, (task_id, rank)) in survivors.into_iter().enumerate() {
        let expected =
            i32::try_from(index.saturating_add(1)).map_err(TaskStoreError::unavailable)?;
        if rank != expected {
            diesel::update(tasks::table.find(task_id))
                .set(tasks::position.eq(expected))
                .execute(txn)?;
        }
    }
    Ok(())
}

fn position_from_db(value: i32) -> TaskStoreResult<Position> {
    let rank = u32::try_from(value).map_err(TaskStoreError::unavailable)?;
    Position::new(rank).map_err(TaskStoreError::unavailable)
}

fn position_to_db(position: Position) -> TaskStoreResult<i32> {
    i32::try_from(position.get()).map_err(TaskStoreError::unavailable)
}

fn to_new_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner: task.owner().into_inner(),
        assignee: task.assignee().into_inner(),
        title: task.title().as_str().to_owned(),
        body: task.body().as_str().to_owned(),
        due_at: task.due_at(),
        priority: task.priority().as_str().to_owned(),
        state: task.state().as_str().to_owned(),
        position: position_to_db(task.position())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        assignee: task.assignee().into_inner(),
        title: task.title().as_str().to_owned(),
        body: task.body().as_str().to_owned(),
        due_at: task.due_at(),
        priority: task.priority().as_str().to_owned(),
        state: task.state().as_str().to_owned(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        owner,
        assignee,
        title: persisted_title,
        body: persisted_body,
        due_at,
        priority: persisted_priority,
        state: persisted_state,
        position: persisted_position,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskStoreError::unavailable)?;
    let body = TaskBody::new(persisted_body).map_err(TaskStoreError::unavailable)?;
    let priority =
        Priority::try_from(persisted_priority.as_str()).map_err(TaskStoreError::unavailable)?;
    let state = LifecycleState::try_from(persisted_state.as_str())
        .map_err(TaskStoreError::unavailable)?;
    let position = position_from_db(persisted_position)?;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        owner: OwnerId::from_uuid(owner),
        assignee: OwnerId::from_uuid(assignee),
        title,
        body,
        due_at,
        priority,
        state,
        position,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
