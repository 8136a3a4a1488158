//! Read operations of the task lifecycle service.
//!
//! Every listing is expressed as a [`TaskQuery`] scoped by the ownership
//! policy, so the repository sees one parameterized predicate instead of a
//! method per filter combination.

use super::lifecycle::{TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{
        OwnershipPolicy, PageRequest, Requester, Task, TaskFilter, TaskId, TaskPage,
        TaskPriority, TaskQuery, TaskStatus,
    },
    ports::TaskRepository,
};
use mockable::Clock;
use tracing::{debug, instrument};

impl<R, P, C> TaskLifecycleService<R, P, C>
where
    R: TaskRepository,
    P: OwnershipPolicy,
    C: Clock + Send + Sync,
{
    /// Looks up a task in the requester's scope.
    ///
    /// Returns `Ok(None)` when the task does not exist or belongs to another
    /// user. Soft-deleted tasks are still returned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthenticated`] when the policy needs
    /// an identity, or [`TaskLifecycleError::Repository`] when the lookup
    /// fails.
    ///
    /// [`TaskLifecycleError::Unauthenticated`]: super::TaskLifecycleError::Unauthenticated
    /// [`TaskLifecycleError::Repository`]: super::TaskLifecycleError::Repository
    pub async fn find_task(
        &self,
        requester: &Requester,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Option<Task>> {
        let scope = self.scope(requester)?;
        Ok(self.repository.find_scoped(task_id, scope).await?)
    }

    /// Lists the requester's live tasks, newest first.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn list_tasks(&self, requester: &Requester) -> TaskLifecycleResult<Vec<Task>> {
        self.list(requester, TaskFilter::new()).await
    }

    /// Lists one page of the requester's live tasks.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn list_tasks_paginated(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> TaskLifecycleResult<TaskPage> {
        self.filter_tasks(requester, TaskFilter::new(), page).await
    }

    /// Lists the requester's live tasks with the given status.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn list_by_status(
        &self,
        requester: &Requester,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.list(requester, TaskFilter::new().with_status(status))
            .await
    }

    /// Lists the requester's live tasks with the given priority.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn list_by_priority(
        &self,
        requester: &Requester,
        priority: TaskPriority,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.list(requester, TaskFilter::new().with_priority(priority))
            .await
    }

    /// Searches the requester's live tasks for a case-insensitive keyword.
    ///
    /// Which fields are searched depends on the ownership policy.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn search_tasks(
        &self,
        requester: &Requester,
        keyword: &str,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let filter = TaskFilter::new()
            .with_keyword(keyword)
            .with_keyword_match(self.policy.keyword_match());
        self.list(requester, filter).await
    }

    /// Lists the requester's archived, live tasks.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn list_archived(&self, requester: &Requester) -> TaskLifecycleResult<Vec<Task>> {
        self.list(requester, TaskFilter::new().with_archived(true))
            .await
    }

    /// Lists the requester's soft-deleted tasks, archived or not.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    #[instrument(skip_all)]
    pub async fn list_deleted(&self, requester: &Requester) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::new(self.scope(requester)?).deleted();
        let page = self.repository.query(&query).await?;
        debug!(count = page.total_items(), "listed deleted tasks");
        Ok(page.into_items())
    }

    /// Lists one page of the requester's live tasks matching every present
    /// constraint of `filter`.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    #[instrument(skip_all, fields(page = page.page(), size = page.size()))]
    pub async fn filter_tasks(
        &self,
        requester: &Requester,
        filter: TaskFilter,
        page: PageRequest,
    ) -> TaskLifecycleResult<TaskPage> {
        let query = TaskQuery::new(self.scope(requester)?)
            .with_filter(filter)
            .paged(page);
        let result = self.repository.query(&query).await?;
        debug!(total = result.total_items(), "filtered tasks");
        Ok(result)
    }

    /// Lists the requester's live, unfinished tasks whose due date has
    /// passed, newest first.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    #[instrument(skip_all)]
    pub async fn list_overdue(&self, requester: &Requester) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::new(self.scope(requester)?).overdue_at(self.clock.utc());
        let page = self.repository.query(&query).await?;
        debug!(count = page.total_items(), "listed overdue tasks");
        Ok(page.into_items())
    }

    /// Counts the requester's live tasks with the given status.
    ///
    /// # Errors
    ///
    /// Fails when the requester cannot be scoped or the repository fails.
    pub async fn count_by_status(
        &self,
        requester: &Requester,
        status: TaskStatus,
    ) -> TaskLifecycleResult<u64> {
        let query = TaskQuery::new(self.scope(requester)?)
            .with_filter(TaskFilter::new().with_status(status));
        Ok(self.repository.count(&query).await?)
    }

    #[instrument(skip_all, fields(filter = ?filter))]
    async fn list(
        &self,
        requester: &Requester,
        filter: TaskFilter,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::new(self.scope(requester)?).with_filter(filter);
        let page = self.repository.query(&query).await?;
        debug!(count = page.total_items(), "listed tasks");
        Ok(page.into_items())
    }
}
