//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Globally unique task identifier.
    pub id: i64,
    /// Owner of the list this task belongs to.
    pub owner: uuid::Uuid,
    /// User responsible for doing the work.
    pub assignee: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-form task body.
    pub body: String,
    /// Due timestamp.
    pub due_at: DateTime<Utc>,
    /// Priority label.
    pub priority: String,
    /// Lifecycle state label.
    pub state: String,
    /// 1-based rank within the owner's active list.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Globally unique task identifier.
    pub id: i64,
    /// Owner of the list this task belongs to.
    pub owner: uuid::Uuid,
    /// User responsible for doing the work.
    pub assignee: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-form task body.
    pub body: String,
    /// Due timestamp.
    pub due_at: DateTime<Utc>,
    /// Priority label.
    pub priority: String,
    /// Lifecycle state label.
    pub state: String,
    /// 1-based rank within the owner's active list.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by field edits.
///
/// Rank is deliberately absent: position changes only move through the
/// reorder operation.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// User responsible for doing the work.
    pub assignee: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-form task body.
    pub body: String,
    /// Due timestamp.
    pub due_at: DateTime<Utc>,
    /// Priority label.
    pub priority: String,
    /// Lifecycle state label.
    pub state: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
