//! Task aggregate root and its caller-supplied content.

use super::{TaskDescription, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskTitle, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-editable content of a task, supplied on creation and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<TaskDescription>,
    /// Progress status.
    pub status: TaskStatus,
    /// Relative importance.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDetails {
    /// Creates details with the given title and default status and priority.
    #[must_use]
    pub fn new(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: TaskDescription) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: Option<UserId>,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    archived: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner, absent for single-tenant tasks.
    pub owner: Option<UserId>,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<TaskDescription>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted archive flag.
    pub archived: bool,
    /// Persisted soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, unarchived and undeleted task.
    #[must_use]
    pub fn new(details: TaskDetails, owner: Option<UserId>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner,
            title: details.title,
            description: details.description,
            status: details.status,
            priority: details.priority,
            due_date: details.due_date,
            archived: false,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            archived: data.archived,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user, if the task is owner-scoped.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns whether the task is archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the soft-delete timestamp, if the task is deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the task is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is live, unfinished and past its due date.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_deleted()
            && self.status != TaskStatus::Completed
            && self.due_date.is_some_and(|due| due < now)
    }

    /// Replaces the caller-editable content of the task.
    ///
    /// Identity, ownership, creation time, archive and deletion state are
    /// left untouched.
    pub fn apply_details(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.title = details.title;
        self.description = details.description;
        self.status = details.status;
        self.priority = details.priority;
        self.due_date = details.due_date;
        self.touch(clock.utc());
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock.utc());
    }

    /// Sets the archive flag.
    pub fn set_archived(&mut self, archived: bool, clock: &impl Clock) {
        self.archived = archived;
        self.touch(clock.utc());
    }

    /// Marks the task as soft-deleted at the current clock time.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        self.soft_delete_at(clock.utc());
    }

    /// Marks the task as soft-deleted at the given instant.
    ///
    /// Bulk deletion uses a single instant for every task it touches.
    pub fn soft_delete_at(&mut self, timestamp: DateTime<Utc>) {
        self.deleted_at = Some(timestamp);
        self.touch(timestamp);
    }

    /// Clears the soft-delete marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotDeleted`] when the task is not
    /// soft-deleted.
    pub fn restore(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.deleted_at.is_none() {
            return Err(TaskDomainError::NotDeleted(self.id));
        }
        self.deleted_at = None;
        self.touch(clock.utc());
        Ok(())
    }

    /// Advances `updated_at`, never moving it backwards.
    fn touch(&mut self, timestamp: DateTime<Utc>) {
        if timestamp > self.updated_at {
            self.updated_at = timestamp;
        }
    }
}
