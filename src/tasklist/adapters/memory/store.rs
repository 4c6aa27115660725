//! In-memory task store with per-owner critical sections.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::tasklist::domain::{
    NewTask, OwnerId, Position, Task, TaskId, TaskPatch, close_gaps, next_position, shift_for_move,
};
use crate::tasklist::ports::{TaskStore, TaskStoreError, TaskStoreResult};

/// Thread-safe in-memory task store.
///
/// Each owner's tasks live behind their own mutex, so same-owner
/// mutations serialise their whole read-modify-write sequence while
/// different owners proceed in parallel. The outer map lock is held only
/// long enough to find or create an owner's shard.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    shards: Arc<RwLock<HashMap<OwnerId, Arc<Mutex<OwnerShard>>>>>,
}

#[derive(Debug, Default)]
struct OwnerShard {
    tasks: HashMap<TaskId, Task>,
}

impl OwnerShard {
    fn active_sorted(&self) -> Vec<Task> {
        let mut active: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.is_active())
            .cloned()
            .collect();
        active.sort_by_key(Task::position);
        active
    }

    fn max_active_position(&self) -> Option<Position> {
        self.tasks
            .values()
            .filter(|task| task.is_active())
            .map(Task::position)
            .max()
    }

    fn active_len(&self) -> TaskStoreResult<u32> {
        let count = self.tasks.values().filter(|task| task.is_active()).count();
        u32::try_from(count).map_err(TaskStoreError::unavailable)
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds or creates the owner's shard.
    fn shard(&self, owner: OwnerId) -> TaskStoreResult<Arc<Mutex<OwnerShard>>> {
        if let Some(shard) = self.shards.read().map_err(lock_failed)?.get(&owner) {
            return Ok(Arc::clone(shard));
        }
        let mut shards = self.shards.write().map_err(lock_failed)?;
        Ok(Arc::clone(shards.entry(owner).or_default()))
    }

    /// Finds the owner's shard without creating one.
    fn existing_shard(&self, owner: OwnerId) -> TaskStoreResult<Option<Arc<Mutex<OwnerShard>>>> {
        Ok(self
            .shards
            .read()
            .map_err(lock_failed)?
            .get(&owner)
            .map(Arc::clone))
    }
}

fn lock_failed<T>(err: PoisonError<T>) -> TaskStoreError {
    TaskStoreError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_active(&self, owner: OwnerId) -> TaskStoreResult<Vec<Task>> {
        match self.existing_shard(owner)? {
            Some(shard) => {
                let guard = shard.lock().map_err(lock_failed)?;
                Ok(guard.active_sorted())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn insert(&self, new_task: NewTask) -> TaskStoreResult<Task> {
        let shard = self.shard(new_task.owner)?;
        let mut guard = shard.lock().map_err(lock_failed)?;
        if guard.tasks.contains_key(&new_task.id) {
            return Err(TaskStoreError::DuplicateId(new_task.id));
        }
        let position = next_position(guard.max_active_position());
        let task = new_task.into_task(position);
        guard.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn update_fields(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        let shard = self
            .existing_shard(owner)?
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        let mut guard = shard.lock().map_err(lock_failed)?;
        let task = guard
            .tasks
            .get_mut(&id)
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        task.apply_patch(&patch, now);
        Ok(task.clone())
    }

    async fn soft_delete(
        &self,
        owner: OwnerId,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        let shard = self
            .existing_shard(owner)?
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        let mut guard = shard.lock().map_err(lock_failed)?;
        let task = guard
            .tasks
            .get_mut(&id)
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        let was_active = task.is_active();
        task.mark_deleted(now);
        let deleted = task.clone();
        if was_active {
            let mut survivors: Vec<&mut Task> = guard
                .tasks
                .values_mut()
                .filter(|candidate| candidate.is_active())
                .collect();
            survivors.sort_by_key(|survivor| survivor.position());
            close_gaps(survivors);
        }
        Ok(deleted)
    }

    async fn move_to_position(
        &self,
        owner: OwnerId,
        id: TaskId,
        new_position: Position,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        let shard = self
            .existing_shard(owner)?
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        let mut guard = shard.lock().map_err(lock_failed)?;
        let target = guard
            .tasks
            .get(&id)
            .filter(|task| task.is_active())
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        let old_position = target.position();
        let len = guard.active_len()?;
        if new_position.get() > len {
            return Err(TaskStoreError::PositionOutOfRange {
                requested: new_position,
                len,
            });
        }
        if let Some(shift) = shift_for_move(old_position, new_position) {
            // The displaced block excludes the target's old rank, so the
            // whole active set can be scanned without special-casing it.
            for task in guard.tasks.values_mut().filter(|task| task.is_active()) {
                let current = task.position();
                if shift.applies_to(current) {
                    task.displaced_to(shift.displaced(current));
                }
            }
        }
        let moved = guard
            .tasks
            .get_mut(&id)
            .ok_or(TaskStoreError::NotFound { owner, id })?;
        moved.moved_to(new_position, now);
        Ok(())
    }
}
