//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title exceeds {max} characters")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The task description exceeds the persisted column width.
    #[error("task description exceeds {max} characters")]
    DescriptionTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The status value is not one of the enumerated task statuses.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    /// The priority value is not one of the enumerated task priorities.
    #[error("unknown task priority: {0}")]
    UnknownPriority(String),

    /// The requested sort field is not sortable.
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    /// The requested page size is outside the accepted range.
    #[error("invalid page size {size}, expected 1..={max}")]
    InvalidPageSize {
        /// Requested page size.
        size: u32,
        /// Largest accepted page size.
        max: u32,
    },

    /// A restore was requested for a task that is not soft-deleted.
    #[error("task {0} is not deleted")]
    NotDeleted(TaskId),

    /// Owner-scoped tasks require an authenticated requester.
    #[error("an authenticated user is required to access owned tasks")]
    IdentityRequired,
}
