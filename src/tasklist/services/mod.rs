//! Application services orchestrating the ordered task list.

mod list_manager;

pub use list_manager::{CreateTaskRequest, TaskListError, TaskListResult, TaskListService};
