//! Configuration validation utilities.

use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::storage::validate_identifier;

use super::app::DatabaseConfig;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse YAML configuration.
    #[error("failed to parse YAML config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation failed.
    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Check a database section before any connection is attempted.
///
/// # Errors
/// Returns `ConfigError::ValidationError` naming the offending field.
pub(crate) fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    database.dialect()?;

    if database.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "database url cannot be empty".to_string(),
        ));
    }

    validate_identifier(&database.table_name)
        .map_err(|e| ConfigError::ValidationError(format!("database table_name: {e}")))?;

    // Only interpolated into DDL when the adapter has to create it
    if !database.database_exists {
        validate_identifier(&database.database_name)
            .map_err(|e| ConfigError::ValidationError(format!("database database_name: {e}")))?;
    }

    if database.pool_size == 0 {
        return Err(ConfigError::ValidationError(
            "database pool_size must be positive".to_string(),
        ));
    }

    if database.connect_timeout.is_zero() {
        return Err(ConfigError::ValidationError(
            "database connect_timeout must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Parse a connection timeout such as `30s`, `500ms` or `1m30s`.
///
/// Zero is rejected.
///
/// # Examples
///
/// ```
/// use casbin_rule_adapter::config::parse_timeout;
///
/// assert_eq!(parse_timeout("30s").unwrap().as_secs(), 30);
/// assert_eq!(parse_timeout("1m30s").unwrap().as_secs(), 90);
/// assert!(parse_timeout("0s").is_err());
/// ```
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let timeout = humantime::parse_duration(s.trim())
        .map_err(|e| format!("invalid timeout '{s}': {e}"))?;
    if timeout.is_zero() {
        return Err(format!("timeout '{s}' must be non-zero"));
    }
    Ok(timeout)
}

/// `${NAME}` or `${NAME:-fallback}`.
static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::-(?P<fallback>[^}]*))?\}")
        .expect("env reference pattern is valid")
});

/// Substitute `${NAME}` and `${NAME:-fallback}` references in connection
/// settings with values from the environment.
///
/// As in POSIX shells, the fallback applies when the variable is unset or
/// empty. A reference without a fallback to an unset variable becomes an
/// empty string.
pub fn expand_env_vars(input: &str) -> String {
    ENV_REFERENCE
        .replace_all(input, |caps: &Captures| {
            let value = std::env::var(&caps["name"]).ok().filter(|v| !v.is_empty());
            match (value, caps.name("fallback")) {
                (Some(value), _) => value,
                (None, Some(fallback)) => fallback.as_str().to_string(),
                (None, None) => String::new(),
            }
        })
        .into_owned()
}
