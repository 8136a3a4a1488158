//! Repository port for task persistence, lookup and listing.

use crate::task::domain::{Task, TaskId, TaskPage, TaskQuery, TaskScope};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// Owner and creation time are fixed at insert and are not rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to several existing tasks as one unit.
    ///
    /// Either every task is written or none is.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when any task does not exist.
    async fn update_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier regardless of owner and deletion state.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds a task by identifier within an ownership scope, regardless of
    /// deletion state.
    ///
    /// Returns `None` when the task does not exist or lies outside `scope`.
    async fn find_scoped(&self, id: TaskId, scope: TaskScope)
    -> TaskRepositoryResult<Option<Task>>;

    /// Returns the page of tasks selected by the query.
    async fn query(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage>;

    /// Counts the tasks matching the query, ignoring its window.
    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64>;

    /// Removes a task irreversibly.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Removes every task in scope irreversibly, returning how many were
    /// removed.
    async fn delete_all(&self, scope: TaskScope) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
