//! Rule adapter: keeps the rule table in sync with an engine's policy model.
//!
//! The adapter translates between [`RuleRecord`]s and policy lines and issues
//! load, save, add and remove operations through an [`Executor`]. It holds no
//! rules of its own; the database is the source of truth between calls and
//! the engine's model is the cache.
//!
//! # Example
//!
//! ```ignore
//! let adapter = AdapterBuilder::new("mysql", "mysql://localhost:3306/")
//!     .credentials("casbin", "secret")
//!     .database_exists(false)
//!     .build()
//!     .await?;
//!
//! let mut model = PolicyModel::new();
//! adapter.load_policy(&mut model).await?;
//! adapter.add_policy("p", "p", &["alice".into(), "data1".into(), "read".into()]).await?;
//! ```

use std::sync::Arc;

use crate::model::{Model, SECTIONS, load_policy_line};
use crate::storage::dialect::{Dialect, validate_identifier};
use crate::storage::executor::{Executor, Statement};
use crate::storage::rule::{MAX_FIELDS, RuleRecord};
use crate::storage::{StorageError, StorageResult, schema};

/// Persistence adapter for policy rules stored in one SQL table.
#[derive(Clone)]
pub struct RuleAdapter {
    executor: Arc<dyn Executor>,
    table: String,
}

impl std::fmt::Debug for RuleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleAdapter")
            .field("dialect", &self.executor.dialect())
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl RuleAdapter {
    /// Open an adapter over an executor, creating the rule table if absent.
    ///
    /// Use this to plug in executors for dialects sqlx does not drive, such
    /// as Oracle. `table` is interpolated into DDL and must be a trusted
    /// identifier.
    ///
    /// # Errors
    /// Returns `StorageError::InvalidIdentifier` for a bad table name, or
    /// the executor's error if the table cannot be created.
    pub async fn open(executor: Arc<dyn Executor>, table: impl Into<String>) -> StorageResult<Self> {
        let table = table.into();
        validate_identifier(&table)?;

        let adapter = Self { executor, table };
        adapter.create_table().await?;
        Ok(adapter)
    }

    /// Rule table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Dialect of the underlying executor.
    pub fn dialect(&self) -> Dialect {
        self.executor.dialect()
    }

    /// Create the rule table if it does not exist.
    pub async fn create_table(&self) -> StorageResult<()> {
        let sql = self.dialect().create_table_sql(&self.table);
        self.executor.execute(&Statement::new(sql)).await?;
        tracing::debug!(table = %self.table, "Rule table ensured");
        Ok(())
    }

    /// Fetch every stored rule row, in no particular order.
    pub async fn load_rules(&self) -> StorageResult<Vec<RuleRecord>> {
        self.executor.fetch_rules(&schema::select_all(&self.table)).await
    }

    /// Load all stored rules into `model`.
    ///
    /// Each row is rendered as a policy line and handed to
    /// [`load_policy_line`]. Returns the number of rows read.
    pub async fn load_policy(&self, model: &mut dyn Model) -> StorageResult<usize> {
        let rules = self.load_rules().await?;

        for rule in &rules {
            load_policy_line(&rule.to_policy_line(), model);
        }

        tracing::debug!(count = rules.len(), table = %self.table, "Policy loaded");
        Ok(rules.len())
    }

    /// Replace every stored rule with the rules of `model`.
    ///
    /// Drops and recreates the table, then inserts the `p` section followed
    /// by the `g` section, all in one transaction. With MySQL the DDL commits
    /// implicitly, so a failure after the drop can leave the table empty or
    /// partially filled. Returns the number of rows written.
    pub async fn save_policy(&self, model: &dyn Model) -> StorageResult<usize> {
        let dialect = self.dialect();
        let mut statements = vec![
            Statement::new(dialect.drop_table_sql(&self.table)),
            Statement::new(dialect.create_table_sql(&self.table)),
        ];

        for sec in SECTIONS {
            for ptype in model.ptypes(sec) {
                for rule in model.get_policy(sec, &ptype) {
                    let record = RuleRecord::from_rule(ptype.as_str(), &rule);
                    statements.push(schema::insert(dialect, &self.table, &record));
                }
            }
        }

        let count = statements.len() - 2;
        self.executor.execute_all(&statements).await?;

        tracing::info!(count, table = %self.table, "Policy saved");
        Ok(count)
    }

    /// Insert one rule. A no-op returning `false` for an empty rule.
    ///
    /// Duplicates are not checked. `_sec` is accepted for engine
    /// compatibility; rows are keyed by `ptype` alone.
    pub async fn add_policy(&self, _sec: &str, ptype: &str, rule: &[String]) -> StorageResult<bool> {
        if rule.is_empty() {
            return Ok(false);
        }

        let record = RuleRecord::from_rule(ptype, rule);
        let statement = schema::insert(self.dialect(), &self.table, &record);
        self.executor.execute(&statement).await?;

        tracing::debug!(ptype, "Policy added");
        Ok(true)
    }

    /// Insert several rules in one transaction, skipping empty ones.
    ///
    /// Returns `false` if nothing was inserted.
    pub async fn add_policies(
        &self,
        _sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> StorageResult<bool> {
        let dialect = self.dialect();
        let statements: Vec<_> = rules
            .iter()
            .filter(|rule| !rule.is_empty())
            .map(|rule| schema::insert(dialect, &self.table, &RuleRecord::from_rule(ptype, rule)))
            .collect();

        if statements.is_empty() {
            return Ok(false);
        }

        self.executor.execute_all(&statements).await?;
        tracing::debug!(ptype, count = statements.len(), "Policies added");
        Ok(true)
    }

    /// Delete every row equal to `rule` under `ptype`.
    ///
    /// Same as [`remove_filtered_policy`](Self::remove_filtered_policy) with
    /// `field_index` 0. Rules longer than [`MAX_FIELDS`] are matched on
    /// their stored prefix. Returns whether any row was deleted.
    pub async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> StorageResult<bool> {
        let rule = &rule[..rule.len().min(MAX_FIELDS)];
        self.remove_filtered_policy(sec, ptype, 0, rule).await
    }

    /// Delete several rules in one transaction.
    ///
    /// Empty rules are skipped. Returns whether any row was deleted.
    pub async fn remove_policies(
        &self,
        _sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> StorageResult<bool> {
        let dialect = self.dialect();
        let statements: Vec<_> = rules
            .iter()
            .filter(|rule| !rule.is_empty())
            .map(|rule| {
                let rule = &rule[..rule.len().min(MAX_FIELDS)];
                schema::delete_filtered(dialect, &self.table, ptype, 0, rule)
            })
            .collect();

        if statements.is_empty() {
            return Ok(false);
        }

        let deleted = self.executor.execute_all(&statements).await?;
        tracing::debug!(ptype, deleted, "Policies removed");
        Ok(deleted > 0)
    }

    /// Delete rows of `ptype` whose columns match `field_values` from
    /// `v{field_index}` on.
    ///
    /// Value `i` must equal column `v{field_index + i}`; other columns are
    /// unconstrained. A no-op returning `false` when `field_values` is empty.
    ///
    /// # Errors
    /// Returns `StorageError::InvalidFilter` if the filter would reach past
    /// `v5`.
    pub async fn remove_filtered_policy(
        &self,
        _sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> StorageResult<bool> {
        if field_values.is_empty() {
            return Ok(false);
        }
        if !schema::filter_in_range(field_index, field_values.len()) {
            return Err(StorageError::InvalidFilter {
                field_index,
                len: field_values.len(),
            });
        }

        let statement =
            schema::delete_filtered(self.dialect(), &self.table, ptype, field_index, field_values);
        let deleted = self.executor.execute(&statement).await?;

        tracing::debug!(ptype, field_index, deleted, "Filtered policies removed");
        Ok(deleted > 0)
    }

    /// Delete every stored rule, keeping the table.
    pub async fn clear_policy(&self) -> StorageResult<()> {
        let deleted = self.executor.execute(&schema::delete_all(&self.table)).await?;
        tracing::info!(deleted, table = %self.table, "Policy cleared");
        Ok(())
    }

    /// Release the executor's connections.
    pub async fn close(&self) {
        self.executor.close().await;
    }
}
