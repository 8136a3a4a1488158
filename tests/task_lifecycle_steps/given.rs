//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmanager::task::{domain::TenancyMode, services::CreateTaskRequest};

#[given("a multi-tenant task service")]
fn multi_tenant_service(world: &mut TaskLifecycleWorld) {
    world.use_mode(TenancyMode::MultiTenant);
}

#[given("a single-tenant task service")]
fn single_tenant_service(world: &mut TaskLifecycleWorld) {
    world.use_mode(TenancyMode::SingleTenant);
}

#[given(r#""{user}" has a task titled "{title}""#)]
fn user_has_task(
    world: &mut TaskLifecycleWorld,
    user: String,
    title: String,
) -> Result<(), eyre::Report> {
    let requester = world.requester(&user);
    let created = run_async(
        world
            .service
            .create_task(&requester, CreateTaskRequest::new(title)),
    )
    .wrap_err("create task in scenario setup")?;
    world.current_task = Some(created);
    Ok(())
}

#[given(r#""{user}" has deleted the task"#)]
fn user_has_deleted_task(world: &mut TaskLifecycleWorld, user: String) -> Result<(), eyre::Report> {
    let requester = world.requester(&user);
    let task_id = world.task()?.id();
    let deleted = run_async(world.service.delete_task(&requester, task_id))
        .wrap_err("delete task in scenario setup")?;
    world.current_task = Some(deleted);
    Ok(())
}
