//! API error types and responses.
//!
//! This module defines the standard error format for all API responses.
//! Authentication failures are deliberately opaque: whatever went wrong with
//! a token or a password, the caller sees the same 401. The detailed cause
//! is logged server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vitalsync_auth::AuthError;
use vitalsync_engine::EngineError;
use vitalsync_store::StoreError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid session token, or rejected login credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested record type is not supported.
    #[error("record type not implemented: {0}")]
    NotImplemented(String),

    /// Invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotImplemented(_) => "not_implemented",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unauthenticated(AuthError::Unauthenticated) => Self::Unauthorized,
            EngineError::Unauthenticated(auth_err) => {
                // Key or cipher trouble, not a bad token.
                tracing::error!(error = %auth_err, "session codec internal error");
                Self::Internal("authentication service error".to_string())
            }
            EngineError::Unauthorized => Self::Unauthorized,
            EngineError::UnknownRecordType(name) => Self::NotImplemented(name),
            EngineError::InvalidUsername(e) => Self::BadRequest(e.to_string()),
            // A malformed record is the caller's fault; everything else in
            // the store is ours.
            EngineError::Store(StoreError::MalformedRecord(msg)) => Self::BadRequest(msg),
            EngineError::Store(store_err) => {
                tracing::error!(error = %store_err, "store error");
                Self::Internal("storage error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from(EngineError::Unauthenticated(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalsync_auth::AuthError;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotImplemented("BloodPressure".into()).status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::BadRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes() {
        assert_eq!(ApiError::Unauthorized.code(), "unauthorized");
        assert_eq!(
            ApiError::NotImplemented("test".into()).code(),
            "not_implemented"
        );
        assert_eq!(ApiError::BadRequest("test".into()).code(), "bad_request");
    }

    #[test]
    fn auth_failures_are_opaque() {
        // Bad tokens and bad passwords map to the same response.
        let from_token = ApiError::from(EngineError::Unauthenticated(AuthError::Unauthenticated));
        let from_login = ApiError::from(EngineError::Unauthorized);
        assert_eq!(from_token.status_code(), from_login.status_code());
        assert_eq!(from_token.code(), from_login.code());
        assert_eq!(from_token.to_string(), from_login.to_string());
    }

    #[test]
    fn store_detail_is_not_echoed() {
        let err = ApiError::from(EngineError::Store(StoreError::Connection(
            "password authentication failed".into(),
        )));
        assert!(!err.to_string().contains("password"));
    }

    #[test]
    fn malformed_record_is_the_callers_fault() {
        let err = ApiError::from(EngineError::Store(StoreError::MalformedRecord(
            "missing metadata.id".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
