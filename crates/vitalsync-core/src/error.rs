//! Common error types for vitalsync.
//!
//! This module provides shared error types that are used across multiple crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur throughout the vitalsync system.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An invalid username was provided.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] crate::username::UsernameError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
