//! Shared test helpers for in-memory task integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmanager::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Requester, Task, TenancyMode, UserId, UserIdentity},
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Service type under test.
pub type TestService = TaskLifecycleService<InMemoryTaskRepository, TenancyMode, DefaultClock>;

/// Builds a service over a fresh repository.
pub fn service_with(mode: TenancyMode) -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        mode,
        Arc::new(DefaultClock),
    )
}

/// Provides a multi-tenant service.
#[fixture]
pub fn service() -> TestService {
    service_with(TenancyMode::MultiTenant)
}

/// Provides a single-tenant service.
#[fixture]
pub fn shared_service() -> TestService {
    service_with(TenancyMode::SingleTenant)
}

/// Builds an authenticated requester with a fresh identifier.
pub fn user(name: &str) -> Requester {
    Requester::from(UserIdentity::new(UserId::new(), name))
}

/// Creates a task with only a title.
///
/// # Errors
///
/// Returns an error if the service rejects the request.
pub async fn create_titled(
    service: &TestService,
    requester: &Requester,
    title: &str,
) -> Result<Task, eyre::Report> {
    Ok(service
        .create_task(requester, CreateTaskRequest::new(title))
        .await?)
}

/// Returns the titles of `tasks` in order.
pub fn titles(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}
