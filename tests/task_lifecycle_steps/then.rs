//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use taskmanager::task::{
    domain::{TaskPriority, TaskStatus},
    services::TaskLifecycleError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.task()?.status();
    eyre::ensure!(actual == expected, "expected status {expected}, found {actual}");
    Ok(())
}

#[then(r#"the stored task status is "{status}""#)]
fn stored_task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;
    let owner = world
        .users
        .values()
        .find(|requester| requester.user_id() == task.owner())
        .ok_or_else(|| eyre::eyre!("no scenario user owns the task"))?;
    let stored = run_async(world.service.find_task(owner, task.id()))?
        .ok_or_else(|| eyre::eyre!("task missing from store"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected stored status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the task priority is "{priority}""#)]
fn task_priority_is(world: &TaskLifecycleWorld, priority: String) -> Result<(), eyre::Report> {
    let expected = TaskPriority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid expected priority in scenario: {err}"))?;
    let actual = world.task()?.priority();
    eyre::ensure!(actual == expected, "expected priority {expected}, found {actual}");
    Ok(())
}

#[then(r#"the task is owned by "{user}""#)]
fn task_owned_by(world: &TaskLifecycleWorld, user: String) -> Result<(), eyre::Report> {
    let requester = world.known_requester(&user)?;
    eyre::ensure!(
        world.task()?.owner() == requester.user_id(),
        "task is not owned by {user}"
    );
    Ok(())
}

#[then("the task is archived")]
fn task_is_archived(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.task()?.is_archived(), "task is not archived");
    Ok(())
}

#[then("the task is not archived")]
fn task_is_not_archived(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(!world.task()?.is_archived(), "task is archived");
    Ok(())
}

#[then("the task is deleted")]
fn task_is_deleted(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.task()?.is_deleted(), "task is not deleted");
    Ok(())
}

#[then("the task is not deleted")]
fn task_is_not_deleted(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(!world.task()?.is_deleted(), "task is deleted");
    Ok(())
}

#[then(r#""{user}" has {count:u64} live tasks"#)]
fn user_has_live_tasks(
    world: &TaskLifecycleWorld,
    user: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let requester = world.known_requester(&user)?;
    let live = run_async(world.service.list_tasks(&requester))?;
    eyre::ensure!(
        u64::try_from(live.len())? == count,
        "expected {count} live tasks for {user}, found {}",
        live.len()
    );
    Ok(())
}

#[then(r#""{user}" has {count:u64} archived tasks"#)]
fn user_has_archived_tasks(
    world: &TaskLifecycleWorld,
    user: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let requester = world.known_requester(&user)?;
    let archived = run_async(world.service.list_archived(&requester))?;
    eyre::ensure!(
        u64::try_from(archived.len())? == count,
        "expected {count} archived tasks for {user}, found {}",
        archived.len()
    );
    Ok(())
}

#[then(r#""{user}" has {count:u64} deleted tasks"#)]
fn user_has_deleted_tasks(
    world: &TaskLifecycleWorld,
    user: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let requester = world.known_requester(&user)?;
    let deleted = run_async(world.service.list_deleted(&requester))?;
    eyre::ensure!(
        u64::try_from(deleted.len())? == count,
        "expected {count} deleted tasks for {user}, found {}",
        deleted.len()
    );
    Ok(())
}

#[then("the request fails with a validation error")]
fn request_fails_validation(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;
    eyre::ensure!(
        result.as_ref().is_err_and(TaskLifecycleError::is_validation),
        "expected a validation error, got {result:?}"
    );
    Ok(())
}

#[then("the request fails as forbidden")]
fn request_fails_forbidden(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;
    eyre::ensure!(
        matches!(result, Err(TaskLifecycleError::Forbidden(_))),
        "expected a forbidden error, got {result:?}"
    );
    Ok(())
}

#[then("{count:u64} tasks are affected")]
fn tasks_are_affected(world: &TaskLifecycleWorld, count: u64) -> Result<(), eyre::Report> {
    let affected = world
        .last_affected
        .ok_or_else(|| eyre::eyre!("no bulk operation recorded"))?;
    eyre::ensure!(affected == count, "expected {count} affected, found {affected}");
    Ok(())
}
