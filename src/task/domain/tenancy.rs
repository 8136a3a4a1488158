//! Ownership scoping strategies.
//!
//! A deployment is either single-tenant, where every caller sees every task,
//! or multi-tenant, where each task belongs to the user who created it. The
//! service receives the strategy at construction and asks it how to scope
//! each request.

use super::{KeywordMatch, Requester, Task, TaskDomainError, UserId};
use serde::{Deserialize, Serialize};

/// Ownership restriction applied to lookups, listings and bulk mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskScope {
    /// Every task is visible.
    Unscoped,
    /// Only tasks owned by the given user are visible.
    Owner(UserId),
}

impl TaskScope {
    /// Returns the owner recorded on tasks created under this scope.
    #[must_use]
    pub const fn owner(self) -> Option<UserId> {
        match self {
            Self::Unscoped => None,
            Self::Owner(owner) => Some(owner),
        }
    }

    /// Returns whether the task is visible under this scope.
    #[must_use]
    pub fn permits(self, task: &Task) -> bool {
        match self {
            Self::Unscoped => true,
            Self::Owner(owner) => task.owner() == Some(owner),
        }
    }
}

/// Behaviour of the delete-all operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkDeleteMode {
    /// Stamp a soft-delete marker on every live task in scope.
    Soft,
    /// Remove every task in scope from the store.
    Permanent,
}

/// Strategy mapping a requester to the tasks it may see and change.
pub trait OwnershipPolicy: Send + Sync {
    /// Resolves the scope for a requester.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IdentityRequired`] when the policy needs an
    /// authenticated requester and none was supplied.
    fn scope_for(&self, requester: &Requester) -> Result<TaskScope, TaskDomainError>;

    /// Fields matched by the plain keyword search.
    fn keyword_match(&self) -> KeywordMatch;

    /// Behaviour of the delete-all operation.
    fn bulk_delete_mode(&self) -> BulkDeleteMode;
}

/// Built-in ownership policies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenancyMode {
    /// No ownership. Search covers titles only and delete-all purges every
    /// record.
    SingleTenant,
    /// Tasks belong to their creator. Search covers titles and descriptions
    /// and delete-all soft-deletes the requester's live tasks.
    #[default]
    MultiTenant,
}

impl OwnershipPolicy for TenancyMode {
    fn scope_for(&self, requester: &Requester) -> Result<TaskScope, TaskDomainError> {
        match self {
            Self::SingleTenant => Ok(TaskScope::Unscoped),
            Self::MultiTenant => requester
                .user_id()
                .map(TaskScope::Owner)
                .ok_or(TaskDomainError::IdentityRequired),
        }
    }

    fn keyword_match(&self) -> KeywordMatch {
        match self {
            Self::SingleTenant => KeywordMatch::Title,
            Self::MultiTenant => KeywordMatch::TitleOrDescription,
        }
    }

    fn bulk_delete_mode(&self) -> BulkDeleteMode {
        match self {
            Self::SingleTenant => BulkDeleteMode::Permanent,
            Self::MultiTenant => BulkDeleteMode::Soft,
        }
    }
}
