//! Shared builders for task unit tests.

use crate::task::domain::{
    PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, TaskTitle, UserId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed instant all persisted fixtures are anchored to.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Builder over [`PersistedTaskData`] for tests needing exact timestamps.
pub struct TaskFixture {
    data: PersistedTaskData,
}

impl TaskFixture {
    pub fn new(title: &str) -> Self {
        Self {
            data: PersistedTaskData {
                id: TaskId::new(),
                owner: None,
                title: TaskTitle::new(title).expect("valid title"),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Medium,
                due_date: None,
                archived: false,
                deleted_at: None,
                created_at: epoch(),
                updated_at: epoch(),
            },
        }
    }

    pub const fn owned_by(mut self, owner: UserId) -> Self {
        self.data.owner = Some(owner);
        self
    }

    pub const fn with_id(mut self, id: TaskId) -> Self {
        self.data.id = id;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.data.description = Some(
            crate::task::domain::TaskDescription::new(description).expect("valid description"),
        );
        self
    }

    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.data.status = status;
        self
    }

    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.data.priority = priority;
        self
    }

    pub fn due_in_hours(mut self, hours: i64) -> Self {
        self.data.due_date = Some(epoch() + Duration::hours(hours));
        self
    }

    pub fn created_minutes_after_epoch(mut self, minutes: i64) -> Self {
        let at = epoch() + Duration::minutes(minutes);
        self.data.created_at = at;
        self.data.updated_at = at;
        self
    }

    pub const fn archived(mut self) -> Self {
        self.data.archived = true;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.data.deleted_at = Some(epoch());
        self
    }

    pub fn build(self) -> Task {
        Task::from_persisted(self.data)
    }
}
