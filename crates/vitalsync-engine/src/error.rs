//! Engine error types.

use thiserror::Error;

use vitalsync_auth::AuthError;
use vitalsync_core::UsernameError;
use vitalsync_store::StoreError;

/// A result type using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the sync engine and provisioning flow.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The session token is missing, malformed, or failed verification.
    #[error("unauthenticated")]
    Unauthenticated(#[from] AuthError),

    /// Login credentials did not match an existing tenant role.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested record type is not in the registry.
    #[error("record type not implemented: {0}")]
    UnknownRecordType(String),

    /// The login username is not a valid tenant name.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// A storage operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
