//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur when issuing or resolving session tokens.
///
/// Token resolution deliberately collapses every failure mode (empty token,
/// malformed encoding, tag verification failure, bad plaintext) into the
/// single [`AuthError::Unauthenticated`] variant so that callers cannot
/// distinguish them. The underlying cause is logged server-side at debug
/// level where the failure occurs.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or failed verification.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The configured session key has the wrong length.
    #[error("session key must be {expected} bytes, got {got}")]
    InvalidKeyLength {
        /// The required key length in bytes.
        expected: usize,
        /// The supplied key length in bytes.
        got: usize,
    },

    /// An internal error occurred while issuing a token.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::InvalidKeyLength { .. } | Self::Internal(_) => 500,
        }
    }
}
