//! Database backends.
//!
//! Currently provides one [`Executor`](crate::storage::executor::Executor)
//! built on sqlx's `Any` driver, which covers MySQL, PostgreSQL and SQLite
//! behind a single pool type. The dialect is chosen from the driver identity,
//! not from the URL scheme.
//!
//! # Example
//!
//! ```ignore
//! let executor = AnyExecutor::connect("sqlite://rules.db?mode=rwc", Dialect::Sqlite, PoolSettings::default()).await?;
//! let rows = executor.fetch_rules(&schema::select_all("casbin_rule")).await?;
//! ```

mod any;

pub use any::{AnyExecutor, PoolSettings};
