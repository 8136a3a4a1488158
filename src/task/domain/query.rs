//! Query, filter, sort and page types for task listings.
//!
//! A single [`TaskQuery`] record describes every listing the service offers.
//! Repositories evaluate it either in memory through [`TaskQuery::matches`]
//! and [`TaskSort::compare`], or by translating it into SQL.

use super::{Task, TaskDomainError, TaskPriority, TaskScope, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Selects live or soft-deleted tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeletionFilter {
    /// Tasks without a soft-delete marker.
    #[default]
    Active,
    /// Soft-deleted tasks only.
    Deleted,
}

impl DeletionFilter {
    /// Returns whether the task satisfies the deletion constraint.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::Active => !task.is_deleted(),
            Self::Deleted => task.is_deleted(),
        }
    }
}

/// Fields searched by a keyword constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// Title only.
    Title,
    /// Title or description.
    #[default]
    TitleOrDescription,
}

/// Conjunctive field constraints. `None` leaves a field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required priority.
    pub priority: Option<TaskPriority>,
    /// Required archive flag.
    pub archived: Option<bool>,
    /// Case-insensitive substring to look for.
    pub keyword: Option<String>,
    /// Fields the keyword is matched against.
    pub keyword_match: KeywordMatch,
}

impl TaskFilter {
    /// Creates a filter with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrains the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Constrains the archive flag.
    #[must_use]
    pub const fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    /// Constrains the title (and, depending on `keyword_match`, the
    /// description) to contain the keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Sets the fields searched by the keyword.
    #[must_use]
    pub const fn with_keyword_match(mut self, keyword_match: KeywordMatch) -> Self {
        self.keyword_match = keyword_match;
        self
    }

    /// Returns whether the task satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self.archived.is_none_or(|archived| task.is_archived() == archived)
            && self
                .keyword
                .as_deref()
                .is_none_or(|keyword| self.keyword_matches(task, keyword))
    }

    fn keyword_matches(&self, task: &Task, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        let in_title = task.title().as_str().to_lowercase().contains(&needle);
        match self.keyword_match {
            KeywordMatch::Title => in_title,
            KeywordMatch::TitleOrDescription => {
                in_title
                    || task
                        .description()
                        .is_some_and(|text| text.as_str().to_lowercase().contains(&needle))
            }
        }
    }
}

/// Task field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Task identifier.
    Id,
    /// Title.
    Title,
    /// Status, by its storage spelling.
    Status,
    /// Priority, by its storage spelling.
    Priority,
    /// Due date. Tasks without one compare greater than any date.
    DueDate,
    /// Creation timestamp.
    CreatedAt,
    /// Latest mutation timestamp.
    UpdatedAt,
}

impl SortField {
    /// Returns the request-facing field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::Id => left.id().cmp(&right.id()),
            Self::Title => left.title().as_str().cmp(right.title().as_str()),
            Self::Status => left.status().as_str().cmp(right.status().as_str()),
            Self::Priority => left.priority().as_str().cmp(right.priority().as_str()),
            Self::DueDate => match (left.due_date(), right.due_date()) {
                (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
            },
            Self::CreatedAt => left.created_at().cmp(&right.created_at()),
            Self::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
        }
    }
}

impl TryFrom<&str> for SortField {
    type Error = TaskDomainError;

    /// Accepts camelCase and `snake_case` spellings.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "dueDate" | "due_date" => Ok(Self::DueDate),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            _ => Err(TaskDomainError::UnknownSortField(value.to_owned())),
        }
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Interprets a request parameter: `asc` in any case is ascending,
    /// anything else is descending.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Listing order. Ties are broken by ascending task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSort {
    /// Primary sort field.
    pub field: SortField,
    /// Direction applied to the primary field.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Creates a sort order.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two tasks under this order.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let primary = match self.direction {
            SortDirection::Ascending => self.field.compare(left, right),
            SortDirection::Descending => self.field.compare(right, left),
        };
        primary.then_with(|| left.id().cmp(&right.id()))
    }
}

impl Default for TaskSort {
    /// Newest first.
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Descending)
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: u32,
    /// Number of items per page, at least one.
    pub size: u32,
}

impl Pagination {
    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Validated page window plus ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pagination: Pagination,
    sort: TaskSort,
}

impl PageRequest {
    /// Page size used when none is requested.
    pub const DEFAULT_SIZE: u32 = 10;
    /// Largest page size accepted by [`Self::new`].
    pub const MAX_SIZE: u32 = 100;

    /// Creates a page request bounded by [`Self::MAX_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPageSize`] when `size` is zero or
    /// exceeds [`Self::MAX_SIZE`].
    pub const fn new(page: u32, size: u32, sort: TaskSort) -> Result<Self, TaskDomainError> {
        Self::bounded(page, size, sort, Self::MAX_SIZE)
    }

    /// Creates a page request bounded by a caller-supplied maximum size.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPageSize`] when `size` is zero or
    /// exceeds `max_size`.
    pub const fn bounded(
        page: u32,
        size: u32,
        sort: TaskSort,
        max_size: u32,
    ) -> Result<Self, TaskDomainError> {
        if size == 0 || size > max_size {
            return Err(TaskDomainError::InvalidPageSize {
                size,
                max: max_size,
            });
        }
        Ok(Self {
            pagination: Pagination { page, size },
            sort,
        })
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.pagination.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.pagination.size
    }

    /// Returns the page window.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Returns the ordering.
    #[must_use]
    pub const fn sort(&self) -> TaskSort {
        self.sort
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            pagination: Pagination {
                page: 0,
                size: Self::DEFAULT_SIZE,
            },
            sort: TaskSort::default(),
        }
    }
}

/// One page of a task listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    items: Vec<Task>,
    page: u32,
    size: u32,
    total_items: u64,
}

impl TaskPage {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<Task>, page: u32, size: u32, total_items: u64) -> Self {
        Self {
            items,
            page,
            size,
            total_items,
        }
    }

    /// Returns the tasks on this page.
    #[must_use]
    pub fn items(&self) -> &[Task] {
        &self.items
    }

    /// Consumes the page, returning its tasks.
    #[must_use]
    pub fn into_items(self) -> Vec<Task> {
        self.items
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the number of matching tasks across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Returns the number of pages needed to hold every matching task.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(self.size))
    }

    /// Returns whether a later page holds more tasks.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages()
    }
}

/// Parameterized predicate, ordering and window evaluated by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Ownership restriction.
    pub scope: TaskScope,
    /// Live or soft-deleted tasks.
    pub deletion: DeletionFilter,
    /// Field constraints.
    pub filter: TaskFilter,
    /// When set, restricts to unfinished tasks due before this instant.
    pub overdue_at: Option<DateTime<Utc>>,
    /// Ordering.
    pub sort: TaskSort,
    /// Page window; `None` returns every match.
    pub pagination: Option<Pagination>,
}

impl TaskQuery {
    /// Creates a query over the live tasks in `scope`, newest first.
    #[must_use]
    pub fn new(scope: TaskScope) -> Self {
        Self {
            scope,
            deletion: DeletionFilter::Active,
            filter: TaskFilter::default(),
            overdue_at: None,
            sort: TaskSort::default(),
            pagination: None,
        }
    }

    /// Restricts the query to soft-deleted tasks.
    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.deletion = DeletionFilter::Deleted;
        self
    }

    /// Applies field constraints.
    #[must_use]
    pub fn with_filter(mut self, filter: TaskFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restricts the query to tasks overdue at `now`.
    #[must_use]
    pub const fn overdue_at(mut self, now: DateTime<Utc>) -> Self {
        self.overdue_at = Some(now);
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }

    /// Applies the window and ordering of a page request.
    #[must_use]
    pub const fn paged(mut self, request: PageRequest) -> Self {
        self.sort = request.sort();
        self.pagination = Some(request.pagination());
        self
    }

    /// Returns whether the task satisfies every predicate of the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.scope.permits(task)
            && self.deletion.matches(task)
            && self.filter.matches(task)
            && self.overdue_at.is_none_or(|now| task.is_overdue_at(now))
    }
}
