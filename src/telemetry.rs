//! Structured logging setup.
//!
//! The crate logs through `tracing`; this module installs a `fmt`
//! subscriber for binaries and test harnesses that want output.

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable that overrides [`LoggingConfig::filter`].
pub const LOG_ENV: &str = "TASKMANAGER_LOG";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive is malformed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Parses a filter directive such as `taskmanager=debug,info`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the directive is malformed.
pub fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    Ok(EnvFilter::try_new(directive)?)
}

/// Installs the global `fmt` subscriber.
///
/// `TASKMANAGER_LOG` wins over the configured filter when it parses.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for a malformed configured filter and
/// [`TelemetryError::Install`] when a global subscriber already exists.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).or_else(|_| parse_filter(&config.filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init()
        .map_err(TelemetryError::Install)
}
