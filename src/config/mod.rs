//! Configuration module for the `casbin-rules` binary.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Database settings (driver, URL, credentials, table name, pool size)

mod app;
mod validation;

pub use app::{AppConfig, DatabaseConfig};
pub use validation::{ConfigError, expand_env_vars, parse_timeout};

// Re-export constants
pub use app::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_POOL_SIZE};
