//! Login endpoint.
//!
//! Authenticates (or first provisions) a tenant and returns a session
//! token. The password appears only inside the request body and the
//! credential probe; it is never logged.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use vitalsync_auth::SessionCodec;

use crate::error::ApiError;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Tenant username.
    pub username: String,
    /// Tenant password.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The issued session token.
    pub sessid: String,
}

/// Login handler.
///
/// Unknown usernames are provisioned on the spot (a database role and a
/// private database); known usernames must present their original password.
///
/// # Example
///
/// ```text
/// POST /api/login
/// {"username": "alice", "password": "hunter2"}
///
/// Response: 201 Created
/// {"sessid": "<token>"}
/// ```
pub async fn login<C>(
    State(state): State<Arc<AppState<C>>>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError>
where
    C: SessionCodec,
{
    let sessid = state
        .service
        .login(&request.username, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(LoginResponse { sessid })))
}
