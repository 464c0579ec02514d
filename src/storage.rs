//! Storage Layer
//!
//! Rule persistence over a SQL database:
//! - **Dialects**: DDL and placeholders per database engine
//! - **Executor**: unit-of-work boundary between the adapter and a driver
//! - **Builder**: connection, database and table initialization
//!
//! # Components
//!
//! - [`RuleRecord`]: One row of the rule table
//! - [`Dialect`]: Supported SQL dialects, parsed from a driver identity
//! - [`Executor`] / [`AnyExecutor`]: Statement execution, sqlx-backed by default
//! - [`AdapterBuilder`]: Initialization of a [`crate::RuleAdapter`]

mod builder;
pub mod db;
pub mod dialect;
mod error;
pub mod executor;
pub mod rule;
pub mod schema;

pub use builder::AdapterBuilder;
pub use db::{AnyExecutor, PoolSettings};
pub use dialect::{Dialect, validate_identifier};
pub use error::{StorageError, StorageResult};
pub use executor::{Executor, Statement};
pub use rule::{MAX_FIELDS, RuleRecord};
