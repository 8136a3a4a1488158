//! Domain model for task lifecycle management.
//!
//! The task domain models task content, status and priority, archive and
//! soft-delete state, ownership scoping, and the query contract used to list
//! tasks, while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod identity;
mod ids;
mod query;
mod status;
mod task;
mod tenancy;

pub use error::TaskDomainError;
pub use identity::{Requester, UserIdentity};
pub use ids::{TaskDescription, TaskId, TaskTitle, UserId};
pub use query::{
    DeletionFilter, KeywordMatch, PageRequest, Pagination, SortDirection, SortField, TaskFilter,
    TaskPage, TaskQuery, TaskSort,
};
pub use status::{TaskPriority, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskDetails};
pub use tenancy::{BulkDeleteMode, OwnershipPolicy, TaskScope, TenancyMode};
