//! Storage-specific error types.
//!
//! All storage operations return [`StorageError`] on failure, which can be
//! matched to determine the underlying cause (database, dialect, filter, etc.).

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed (sqlx error).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Driver identity does not name a supported SQL dialect, or no
    /// executor is available for the dialect.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Table or database name is not a plain SQL identifier.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Filter values would reach past the last rule column.
    #[error("filter out of range: field_index {field_index} with {len} value(s) exceeds v5")]
    InvalidFilter {
        /// Starting column index of the filter.
        field_index: usize,
        /// Number of filter values.
        len: usize,
    },

    /// Connection URL could not be parsed or rewritten.
    #[error("invalid connection url: {0}")]
    Url(#[from] url::ParseError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
