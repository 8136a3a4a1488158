//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`TASKMANAGER_*` prefix, `__` between sections)
//! 2. `taskmanager.toml` in the working directory, or an explicit file
//! 3. Built-in defaults
//!
//! `TASKMANAGER_PAGINATION__MAX_PAGE_SIZE` maps to `pagination.max_page_size`
//! and `TASKMANAGER_TENANCY` selects the ownership policy.

mod database;
mod error;
mod logging;
mod pagination;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use pagination::PaginationConfig;

use crate::task::domain::{PageRequest, TaskDomainError, TenancyMode};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TASKMANAGER_";

/// Default configuration file, resolved against the working directory.
pub const CONFIG_FILE: &str = "taskmanager.toml";

/// Root configuration for the task manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskManagerConfig {
    /// Ownership policy applied to every request.
    #[serde(default)]
    pub tenancy: TenancyMode,
    /// Listing page sizes.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// `PostgreSQL` store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TaskManagerConfig {
    /// Loads and validates configuration from defaults, `taskmanager.toml`
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] when a setting is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Loads configuration with `path` in place of `taskmanager.toml`.
    ///
    /// # Errors
    ///
    /// As for [`Self::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::extract(Self::layered(Some(path.as_ref().to_path_buf())))
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let local_path = PathBuf::from(CONFIG_FILE);
        Self::layered(local_path.exists().then_some(local_path))
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.validate()?;
        self.database.validate()
    }

    /// Builds a [`PageRequest`] bounded by the configured page sizes.
    ///
    /// # Errors
    ///
    /// See [`PaginationConfig::page_request`].
    pub fn page_request(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        sort_by: Option<&str>,
        sort_dir: Option<&str>,
    ) -> Result<PageRequest, TaskDomainError> {
        self.pagination.page_request(page, size, sort_by, sort_dir)
    }

    fn layered(file: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
