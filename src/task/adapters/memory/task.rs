//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::task::{
    domain::{Task, TaskId, TaskPage, TaskQuery, TaskScope},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(err: PoisonError<T>) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn saturating_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Collects the tasks matching `query` in query order.
fn select(tasks: &HashMap<TaskId, Task>, query: &TaskQuery) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .values()
        .filter(|task| query.matches(task))
        .cloned()
        .collect();
    selected.sort_by(|left, right| query.sort.compare(left, right));
    selected
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn update_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        // Validate the whole batch before writing so a miss leaves the store untouched.
        if let Some(missing) = tasks.iter().find(|task| !state.contains_key(&task.id())) {
            return Err(TaskRepositoryError::NotFound(missing.id()));
        }
        for task in tasks {
            state.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_scoped(
        &self,
        id: TaskId,
        scope: TaskScope,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).filter(|task| scope.permits(task)).cloned())
    }

    async fn query(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let selected = select(&state, query);
        let total_items = saturating_u64(selected.len());

        let Some(pagination) = query.pagination else {
            let size = u32::try_from(selected.len()).unwrap_or(u32::MAX);
            return Ok(TaskPage::new(selected, 0, size, total_items));
        };

        let items = selected
            .into_iter()
            .skip(saturating_usize(pagination.offset()))
            .take(saturating_usize(u64::from(pagination.size)))
            .collect();
        Ok(TaskPage::new(
            items,
            pagination.page,
            pagination.size,
            total_items,
        ))
    }

    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let matching = state.values().filter(|task| query.matches(task)).count();
        Ok(saturating_u64(matching))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn delete_all(&self, scope: TaskScope) -> TaskRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|_, task| !scope.permits(task));
        Ok(saturating_u64(before - state.len()))
    }
}
