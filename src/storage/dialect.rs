//! SQL dialects and their DDL.
//!
//! Each [`Dialect`] knows how to render the statements whose shape differs
//! between database engines: database creation, rule table creation and
//! removal, and bind placeholders. Everything else is plain ANSI SQL built
//! in [`crate::storage::schema`].
//!
//! Table and database names are interpolated into the SQL text, not bound.
//! They must be static, trusted names; [`validate_identifier`] rejects
//! anything that is not a plain identifier.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::storage::schema::{COLUMN_WIDTH, RULE_COLUMNS};
use crate::storage::{StorageError, StorageResult};

/// Maximum identifier length accepted for table and database names.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Supported SQL dialects.
///
/// Parsed from a driver identity string. Both short names and the JDBC
/// driver class names used by other Casbin adapters are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dialect {
    /// MySQL / MariaDB.
    #[strum(to_string = "mysql", serialize = "mariadb", serialize = "com.mysql.cj.jdbc.Driver")]
    MySql,
    /// PostgreSQL.
    #[strum(to_string = "postgres", serialize = "postgresql", serialize = "org.postgresql.Driver")]
    Postgres,
    /// SQLite.
    #[strum(to_string = "sqlite", serialize = "org.sqlite.JDBC")]
    Sqlite,
    /// Oracle. DDL only; no sqlx driver exists, so a custom executor is required.
    #[strum(to_string = "oracle", serialize = "oracle.jdbc.OracleDriver")]
    Oracle,
}

impl Dialect {
    /// Parse a driver identity string.
    ///
    /// # Errors
    /// Returns `StorageError::UnsupportedDialect` for unknown identities.
    pub fn from_driver(driver: &str) -> StorageResult<Self> {
        driver
            .trim()
            .parse()
            .map_err(|_| StorageError::UnsupportedDialect(driver.to_string()))
    }

    /// Bind placeholder for the 1-based parameter `n`.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Self::MySql | Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${n}"),
            Self::Oracle => format!(":{n}"),
        }
    }

    /// Statement creating the database, if the dialect has one.
    ///
    /// SQLite creates the database file on connect and Oracle has no
    /// per-adapter database, so both return `None`.
    pub fn create_database_sql(&self, database: &str) -> Option<String> {
        match self {
            Self::MySql => Some(format!("CREATE DATABASE IF NOT EXISTS {database}")),
            Self::Postgres => Some(format!("CREATE DATABASE {database}")),
            Self::Sqlite | Self::Oracle => None,
        }
    }

    /// Statement creating the rule table unless it already exists.
    pub fn create_table_sql(&self, table: &str) -> String {
        let columns = column_definitions();
        match self {
            Self::MySql | Self::Postgres | Self::Sqlite => {
                format!("CREATE TABLE IF NOT EXISTS {table} ({columns})")
            }
            Self::Oracle => format!(
                "DECLARE n_count NUMBER; \
                 BEGIN \
                 SELECT COUNT(*) INTO n_count FROM user_tables WHERE table_name = UPPER('{table}'); \
                 IF n_count <= 0 THEN \
                 EXECUTE IMMEDIATE 'CREATE TABLE {table} ({columns})'; \
                 END IF; \
                 END;"
            ),
        }
    }

    /// Statement dropping the rule table if it exists.
    pub fn drop_table_sql(&self, table: &str) -> String {
        match self {
            Self::MySql | Self::Postgres | Self::Sqlite => format!("DROP TABLE IF EXISTS {table}"),
            Self::Oracle => format!(
                "DECLARE n_count NUMBER; \
                 BEGIN \
                 SELECT COUNT(*) INTO n_count FROM user_tables WHERE table_name = UPPER('{table}'); \
                 IF n_count >= 1 THEN \
                 EXECUTE IMMEDIATE 'DROP TABLE {table}'; \
                 END IF; \
                 END;"
            ),
        }
    }

    /// Whether credentials and database names live in the connection URL.
    pub fn is_networked(&self) -> bool {
        !matches!(self, Self::Sqlite)
    }
}

/// Column list shared by every dialect: `ptype` is mandatory, `v0`..`v5` nullable.
fn column_definitions() -> String {
    RULE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| {
            if i == 0 {
                format!("{col} VARCHAR({COLUMN_WIDTH}) NOT NULL")
            } else {
                format!("{col} VARCHAR({COLUMN_WIDTH})")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that a table or database name is a plain SQL identifier.
///
/// # Errors
/// Returns `StorageError::InvalidIdentifier` unless the name matches
/// `[A-Za-z_][A-Za-z0-9_]*` and is at most [`MAX_IDENTIFIER_LEN`] bytes.
pub fn validate_identifier(name: &str) -> StorageResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier(name.to_string()))
    }
}
