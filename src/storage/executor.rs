//! SQL execution interface.
//!
//! The adapter never talks to a driver directly. It builds [`Statement`]s
//! and hands them to an [`Executor`], which owns connections and unit-of-work
//! boundaries. [`crate::storage::db::AnyExecutor`] is the shipped sqlx
//! implementation; other backends (e.g. Oracle) plug in by implementing the
//! trait.

use async_trait::async_trait;

use crate::storage::dialect::Dialect;
use crate::storage::rule::RuleRecord;
use crate::storage::StorageResult;

/// A SQL statement with positional parameters.
///
/// Parameters are bound in order; `None` binds `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text, using the dialect's placeholders.
    pub sql: String,
    /// Bound parameters.
    pub params: Vec<Option<String>>,
}

impl Statement {
    /// Statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Statement with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<Option<String>>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Executes statements against the backing database.
///
/// Every call is its own unit of work: a connection is checked out, used,
/// and returned before the call completes, on success and on error.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Dialect the executor speaks.
    fn dialect(&self) -> Dialect;

    /// Execute one auto-committed statement.
    ///
    /// Returns the number of affected rows.
    async fn execute(&self, statement: &Statement) -> StorageResult<u64>;

    /// Execute statements in order inside one transaction.
    ///
    /// Either all statements take effect or none do, within the limits of
    /// the database (MySQL commits implicitly around DDL). Returns the total
    /// number of affected rows.
    async fn execute_all(&self, statements: &[Statement]) -> StorageResult<u64>;

    /// Run a query returning rule rows.
    async fn fetch_rules(&self, statement: &Statement) -> StorageResult<Vec<RuleRecord>>;

    /// Release all connections.
    async fn close(&self);
}
