//! Casbin Rule Adapter - SQL persistence for policy rules
//!
//! This crate lets a Casbin-style enforcement engine load its policy from a
//! relational database and write changes back. It can be used as a library
//! by the engine, or run as the `casbin-rules` binary to inspect and edit
//! stored rules.
//!
//! # Architecture
//!
//! - **Adapter**: translation between rule rows and policy lines, plus CRUD
//! - **Storage**: dialects, statement execution, initialization
//! - **Model**: the slice of the engine's in-memory model the adapter needs
//! - **Config**: YAML configuration for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use casbin_rule_adapter::{AdapterBuilder, PolicyModel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = AdapterBuilder::new("mysql", "mysql://localhost:3306/")
//!         .credentials("casbin", "secret")
//!         .database_exists(false)
//!         .build()
//!         .await?;
//!
//!     let mut model = PolicyModel::new();
//!     adapter.load_policy(&mut model).await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod model;
pub mod storage;

pub use adapter::RuleAdapter;
pub use model::{Model, PolicyModel, load_policy_line, section_of};
pub use storage::{AdapterBuilder, Dialect, RuleRecord, StorageError};
