//! Diesel schema for task list persistence.
//!
//! There is deliberately no unique index on `(owner, position)`: a block
//! shift rewrites ranks row by row and would collide transiently. Density
//! of active ranks is guaranteed by the per-owner advisory-locked
//! transactions in the store instead.

diesel::table! {
    /// Task records, one row per task including soft-deleted tombstones.
    tasks (id) {
        /// Globally unique task identifier.
        id -> Int8,
        /// Owner of the list this task belongs to.
        owner -> Uuid,
        /// User responsible for doing the work.
        assignee -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form task body.
        body -> Text,
        /// Due timestamp.
        due_at -> Timestamptz,
        /// Priority label.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle state label; `deleted` rows are tombstones.
        #[max_length = 20]
        state -> Varchar,
        /// 1-based rank within the owner's active list; stale on tombstones.
        position -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Single-row high-water mark for issued task identifiers.
    ///
    /// Seeded with one row (`singleton = true`, `last_id = 0`) at schema
    /// creation; the allocator bumps and returns `last_id` in one
    /// statement.
    id_high_water (singleton) {
        /// Always `true`; constrains the table to one row.
        singleton -> Bool,
        /// Greatest identifier issued so far.
        last_id -> Int8,
    }
}
