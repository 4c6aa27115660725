//! Shared world state for task reordering BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskrank::tasklist::{
    adapters::memory::{InMemoryTaskStore, SerialIdAllocator},
    domain::OwnerId,
    services::{TaskListError, TaskListService},
};

/// Service type used by the BDD world.
pub type ScenarioService = TaskListService<InMemoryTaskStore, SerialIdAllocator, DefaultClock>;

/// Scenario world for reordering behaviour tests.
pub struct ReorderWorld {
    pub service: ScenarioService,
    pub owner: OwnerId,
    pub last_reorder: Option<Result<(), TaskListError>>,
}

impl ReorderWorld {
    /// Creates a world with a fresh service and an empty list.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskListService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(SerialIdAllocator::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            owner: OwnerId::new(),
            last_reorder: None,
        }
    }
}

impl Default for ReorderWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReorderWorld {
    ReorderWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
