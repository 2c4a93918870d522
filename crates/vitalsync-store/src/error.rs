//! Error types for the storage layer.

use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening a connection or switching role failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A DDL statement failed.
    #[error("schema error: {0}")]
    Schema(String),

    /// A DML statement failed.
    #[error("query error: {0}")]
    Query(String),

    /// An inbound record is missing required structure.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
