//! Service layer for task creation and lifecycle transitions.

use crate::task::{
    domain::{
        BulkDeleteMode, OwnershipPolicy, Requester, Task, TaskDescription, TaskDetails,
        TaskDomainError, TaskId, TaskPriority, TaskQuery, TaskScope, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status by name. Defaults to `TODO` when unset.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority by name. Defaults to `MEDIUM` when unset.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    fn into_details(self) -> Result<TaskDetails, TaskDomainError> {
        parse_details(
            self.title,
            self.description,
            self.status.as_deref(),
            self.priority.as_deref(),
            self.due_date,
        )
    }
}

/// Request payload replacing the editable content of a task.
///
/// Status and priority left unset fall back to `TODO` and `MEDIUM`, as on
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    title: String,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Creates a request with the target task and its new title.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status by name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority by name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for changing only the status of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
}

impl UpdateTaskStatusRequest {
    /// Creates a status change request.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
        }
    }
}

fn parse_details(
    title: String,
    description: Option<String>,
    status: Option<&str>,
    priority: Option<&str>,
    due_date: Option<DateTime<Utc>>,
) -> Result<TaskDetails, TaskDomainError> {
    let status = status.map(TaskStatus::try_from).transpose()?;
    let priority = priority.map(TaskPriority::try_from).transpose()?;
    Ok(TaskDetails {
        title: TaskTitle::new(title)?,
        description: description.map(TaskDescription::new).transpose()?,
        status: status.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        due_date,
    })
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist or lies outside the requester's scope.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The task exists but belongs to another user.
    #[error("task {0} belongs to another user")]
    Forbidden(TaskId),
    /// The request needs an authenticated user and none was supplied.
    #[error("an authenticated user is required")]
    Unauthenticated,
    /// Input or transition validation failed.
    #[error(transparent)]
    Validation(TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Returns whether the error is a validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<TaskDomainError> for TaskLifecycleError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::IdentityRequired => Self::Unauthenticated,
            other => Self::Validation(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// The ownership policy decides whether requests are scoped to the calling
/// user; every other rule is shared between tenancy modes.
#[derive(Clone)]
pub struct TaskLifecycleService<R, P, C>
where
    R: TaskRepository,
    P: OwnershipPolicy,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    pub(super) policy: P,
    pub(super) clock: Arc<C>,
}

impl<R, P, C> TaskLifecycleService<R, P, C>
where
    R: TaskRepository,
    P: OwnershipPolicy,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, policy: P, clock: Arc<C>) -> Self {
        Self {
            repository,
            policy,
            clock,
        }
    }

    /// Returns the ownership policy.
    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Creates a task owned by the requester under the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for a blank title or an
    /// unknown status or priority, [`TaskLifecycleError::Unauthenticated`]
    /// when the policy needs an identity, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    #[instrument(skip_all)]
    pub async fn create_task(
        &self,
        requester: &Requester,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let scope = self.scope(requester)?;
        let details = request.into_details()?;
        let task = Task::new(details, scope.owner(), &*self.clock);
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            owner = ?task.owner(),
            status = %task.status(),
            priority = %task.priority(),
            "task created"
        );
        Ok(task)
    }

    /// Replaces the title, description, status, priority and due date of a
    /// task in the requester's scope.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, [`TaskLifecycleError::Validation`] for invalid
    /// content, or [`TaskLifecycleError::Repository`] when persistence fails.
    #[instrument(skip_all, fields(task_id = %request.task_id))]
    pub async fn update_task(
        &self,
        requester: &Requester,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let scope = self.scope(requester)?;
        let UpdateTaskRequest {
            task_id,
            title,
            description,
            status,
            priority,
            due_date,
        } = request;
        let details = parse_details(
            title,
            description,
            status.as_deref(),
            priority.as_deref(),
            due_date,
        )?;

        let mut task = self.load_scoped(task_id, scope).await?;
        task.apply_details(details, &*self.clock);
        self.repository.update(&task).await?;
        info!("task updated");
        Ok(task)
    }

    /// Changes only the status of a task in the requester's scope.
    ///
    /// The status is parsed before the task is looked up, so an unknown
    /// value leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for an unknown status,
    /// [`TaskLifecycleError::NotFound`] when the task is missing or owned by
    /// someone else, or [`TaskLifecycleError::Repository`] when persistence
    /// fails.
    #[instrument(skip_all, fields(task_id = %request.task_id))]
    pub async fn update_status(
        &self,
        requester: &Requester,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        let status = TaskStatus::try_from(request.status.as_str())?;
        let clock = &*self.clock;
        let task = self
            .mutate_scoped(requester, request.task_id, |task| {
                task.set_status(status, clock);
            })
            .await?;
        info!(%status, "task status changed");
        Ok(task)
    }

    /// Archives a task in the requester's scope.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, or [`TaskLifecycleError::Repository`] when
    /// persistence fails.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn archive_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        self.set_archived(requester, task_id, true).await
    }

    /// Unarchives a task in the requester's scope.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, or [`TaskLifecycleError::Repository`] when
    /// persistence fails.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn unarchive_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        self.set_archived(requester, task_id, false).await
    }

    /// Soft-deletes a task in the requester's scope.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, or [`TaskLifecycleError::Repository`] when
    /// persistence fails.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn delete_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let task = self
            .mutate_scoped(requester, task_id, |task| task.soft_delete(clock))
            .await?;
        info!("task soft-deleted");
        Ok(task)
    }

    /// Clears the soft-delete marker of the requester's task.
    ///
    /// The task is looked up without scoping, so a task owned by someone
    /// else is reported as forbidden rather than missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Forbidden`] when it belongs to another user,
    /// [`TaskLifecycleError::Validation`] when it is not deleted, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn restore_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        let scope = self.scope(requester)?;
        let mut task = self.load_owned(task_id, scope).await?;
        task.restore(&*self.clock)?;
        self.repository.update(&task).await?;
        info!("task restored");
        Ok(task)
    }

    /// Removes the requester's task from the store irreversibly, whether or
    /// not it is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Forbidden`] when it belongs to another user, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn permanently_delete_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<()> {
        let scope = self.scope(requester)?;
        let task = self.load_owned(task_id, scope).await?;
        self.repository.delete(task.id()).await?;
        info!("task permanently deleted");
        Ok(())
    }

    /// Deletes every task in the requester's scope and returns how many
    /// tasks were affected.
    ///
    /// Under [`BulkDeleteMode::Soft`] every live task receives the same
    /// deletion timestamp and the batch is written as one unit. Under
    /// [`BulkDeleteMode::Permanent`] every task in scope is purged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthenticated`] when the policy needs
    /// an identity, or [`TaskLifecycleError::Repository`] when persistence
    /// fails.
    #[instrument(skip_all)]
    pub async fn delete_all_tasks(&self, requester: &Requester) -> TaskLifecycleResult<u64> {
        let scope = self.scope(requester)?;
        let mode = self.policy.bulk_delete_mode();
        let affected = match mode {
            BulkDeleteMode::Permanent => self.repository.delete_all(scope).await?,
            BulkDeleteMode::Soft => {
                let mut live = self
                    .repository
                    .query(&TaskQuery::new(scope))
                    .await?
                    .into_items();
                let timestamp = self.clock.utc();
                for task in &mut live {
                    task.soft_delete_at(timestamp);
                }
                self.repository.update_all(&live).await?;
                u64::try_from(live.len()).unwrap_or(u64::MAX)
            }
        };
        info!(?mode, count = affected, "tasks bulk-deleted");
        Ok(affected)
    }

    pub(super) fn scope(&self, requester: &Requester) -> TaskLifecycleResult<TaskScope> {
        self.policy
            .scope_for(requester)
            .map_err(TaskLifecycleError::from)
    }

    async fn set_archived(
        &self,
        requester: &Requester,
        task_id: TaskId,
        archived: bool,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let task = self
            .mutate_scoped(requester, task_id, |task| task.set_archived(archived, clock))
            .await?;
        info!(archived, "task archive flag changed");
        Ok(task)
    }

    /// Loads a task through a scoped lookup, applies `change` and persists
    /// the result.
    async fn mutate_scoped<F>(
        &self,
        requester: &Requester,
        task_id: TaskId,
        change: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task),
    {
        let scope = self.scope(requester)?;
        let mut task = self.load_scoped(task_id, scope).await?;
        change(&mut task);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Scoped lookup. Tasks outside the scope are reported as missing.
    async fn load_scoped(&self, task_id: TaskId, scope: TaskScope) -> TaskLifecycleResult<Task> {
        self.repository
            .find_scoped(task_id, scope)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Unscoped lookup followed by an explicit ownership check.
    async fn load_owned(&self, task_id: TaskId, scope: TaskScope) -> TaskLifecycleResult<Task> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        if !scope.permits(&task) {
            warn!(%task_id, "ownership check rejected request");
            return Err(TaskLifecycleError::Forbidden(task_id));
        }
        Ok(task)
    }
}
