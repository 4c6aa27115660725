//! Given steps for task reordering BDD scenarios.

use super::world::{ReorderWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use mockable::{Clock, DefaultClock};
use rstest_bdd_macros::given;
use taskrank::tasklist::domain::Priority;
use taskrank::tasklist::services::CreateTaskRequest;

#[given("a list of {count:u32} tasks")]
fn seeded_list(world: &mut ReorderWorld, count: u32) -> Result<(), eyre::Report> {
    for index in 1..=count {
        let request = CreateTaskRequest::new(
            world.owner,
            format!("Task {index}"),
            "scenario body",
            DefaultClock.utc() + Duration::days(1),
            Priority::Medium,
        );
        run_async(world.service.create(request)).wrap_err("seed task for scenario")?;
    }
    Ok(())
}
