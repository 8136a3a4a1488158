//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for task records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Status in storage spelling.
    pub status: String,
    /// Priority in storage spelling.
    pub priority: String,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Archive flag.
    pub archived: bool,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written on update. Owner and creation time stay fixed.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Status in storage spelling.
    pub status: String,
    /// Priority in storage spelling.
    pub priority: String,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Archive flag.
    pub archived: bool,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
