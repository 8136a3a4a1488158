//! Listing page-size settings.

use super::ConfigError;
use crate::task::domain::{PageRequest, SortDirection, SortField, TaskDomainError, TaskSort};
use serde::{Deserialize, Serialize};

const fn default_page_size() -> u32 {
    PageRequest::DEFAULT_SIZE
}

const fn default_max_page_size() -> u32 {
    PageRequest::MAX_SIZE
}

/// Page sizes applied to paginated listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Size used when a request names none.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest size a request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Builds a [`PageRequest`] from optional request parameters.
    ///
    /// Missing values fall back to page zero, the configured default size and
    /// newest-first ordering. The sort direction is lenient: only `asc` sorts
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnknownSortField`] for an unrecognised sort
    /// field and [`TaskDomainError::InvalidPageSize`] when the size is zero or
    /// above [`Self::max_page_size`].
    pub fn page_request(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        sort_by: Option<&str>,
        sort_dir: Option<&str>,
    ) -> Result<PageRequest, TaskDomainError> {
        let field = sort_by
            .map(SortField::try_from)
            .transpose()?
            .unwrap_or(SortField::CreatedAt);
        let direction = sort_dir.map_or(SortDirection::Descending, SortDirection::from_param);
        PageRequest::bounded(
            page.unwrap_or(0),
            size.unwrap_or(self.default_page_size),
            TaskSort::new(field, direction),
            self.max_page_size,
        )
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::invalid(
                "pagination.max_page_size",
                "must be at least 1",
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::invalid(
                "pagination.default_page_size",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }
        Ok(())
    }
}
