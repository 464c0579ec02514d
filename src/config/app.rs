//! Application configuration structures.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::schema::{DEFAULT_DATABASE_NAME, DEFAULT_TABLE_NAME};
use crate::storage::{AdapterBuilder, Dialect};

use super::validation::{ConfigError, expand_env_vars, validate_database};

// =============================================================================
// Constants
// =============================================================================

/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Default connection timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_database_exists() -> bool {
    true
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

// =============================================================================
// Database Configuration
// =============================================================================

/// Database configuration.
///
/// `url`, `username` and `password` support `${VAR}` and `${VAR:-default}`
/// environment expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Driver identity selecting the SQL dialect (e.g. "mysql", "postgres",
    /// "sqlite", "com.mysql.cj.jdbc.Driver").
    pub driver: String,

    /// Connection URL.
    pub url: String,

    /// Username injected into the URL.
    #[serde(default)]
    pub username: Option<String>,

    /// Password injected into the URL.
    #[serde(default)]
    pub password: Option<String>,

    /// Whether the database in `url` already exists (default: true).
    ///
    /// When false, `url` points at the server and `database_name` is created.
    #[serde(default = "default_database_exists")]
    pub database_exists: bool,

    /// Database created when `database_exists` is false (default: "casbin").
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Rule table name (default: "casbin_rule").
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Connection pool size (default: 4).
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection acquire timeout (default: "30s").
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            url: "sqlite://casbin.db?mode=rwc".to_string(),
            username: None,
            password: None,
            database_exists: true,
            database_name: default_database_name(),
            table_name: default_table_name(),
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// Dialect named by `driver`.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` for an unknown driver.
    pub fn dialect(&self) -> Result<Dialect, ConfigError> {
        Dialect::from_driver(&self.driver)
            .map_err(|e| ConfigError::ValidationError(format!("database driver: {e}")))
    }

    /// Adapter builder for this configuration.
    pub fn adapter_builder(&self) -> AdapterBuilder {
        let mut builder = AdapterBuilder::new(&self.driver, &self.url)
            .database_exists(self.database_exists)
            .database_name(&self.database_name)
            .table_name(&self.table_name)
            .pool_size(self.pool_size)
            .connect_timeout(self.connect_timeout);

        if self.username.is_some() || self.password.is_some() {
            builder = builder.credentials(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            );
        }

        builder
    }

    fn expand_env(&mut self) {
        self.url = expand_env_vars(&self.url);
        self.username = self.username.as_deref().map(expand_env_vars);
        self.password = self.password.as_deref().map(expand_env_vars);
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, expand env vars, and validate.
    ///
    /// # Errors
    /// Returns `ConfigError` if the text cannot be parsed or validated.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.database.expand_env();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)
    }
}
