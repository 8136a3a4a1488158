//! Shared world state for task lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmanager::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Requester, Task, TenancyMode, UserId, UserIdentity},
    services::{TaskLifecycleError, TaskLifecycleService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, TenancyMode, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub service: TestTaskService,
    pub users: HashMap<String, Requester>,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
    pub last_affected: Option<u64>,
}

impl TaskLifecycleWorld {
    /// Creates a multi-tenant world with no users or tasks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: build_service(TenancyMode::MultiTenant),
            users: HashMap::new(),
            current_task: None,
            last_result: None,
            last_affected: None,
        }
    }

    /// Replaces the service with a fresh one under `mode`.
    pub fn use_mode(&mut self, mode: TenancyMode) {
        self.service = build_service(mode);
    }

    /// Returns the named requester, registering a new identity on first use.
    pub fn requester(&mut self, name: &str) -> Requester {
        self.users
            .entry(name.to_owned())
            .or_insert_with(|| Requester::from(UserIdentity::new(UserId::new(), name)))
            .clone()
    }

    /// Returns a previously registered requester.
    ///
    /// # Errors
    ///
    /// Returns an error if no step has mentioned the user yet.
    pub fn known_requester(&self, name: &str) -> Result<Requester, eyre::Report> {
        self.users
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("user {name} has not been introduced"))
    }

    /// Returns the task the scenario is acting on.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records the outcome of a single-task operation.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.current_task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn build_service(mode: TenancyMode) -> TestTaskService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        mode,
        Arc::new(DefaultClock),
    )
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
