//! Record sync endpoint.
//!
//! Accepts a batch of records of a single type and upserts them into the
//! caller's private database. The session token travels in the body's
//! `userid` field.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use vitalsync_auth::SessionCodec;
use vitalsync_store::SyncRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Sync request body.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// The session token issued by login.
    pub userid: String,
    /// The records to upsert, in order.
    #[serde(default)]
    pub data: Vec<SyncRecord>,
}

/// Sync response body.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// Always `true`; failures are reported through the error envelope.
    pub success: bool,
}

/// Sync handler.
///
/// The record type comes from the path; an empty `data` array succeeds
/// without touching the database.
///
/// # Example
///
/// ```text
/// POST /api/sync/BodyFat
/// {"userid": "<token>", "data": [{"metadata": {"id": "r1"}, ...}]}
///
/// Response: 200 OK
/// {"success": true}
/// ```
pub async fn sync<C>(
    State(state): State<Arc<AppState<C>>>,
    Path(record_type): Path<String>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError>
where
    C: SessionCodec,
{
    state
        .service
        .sync(&request.userid, &record_type, &request.data)
        .await?;

    Ok(Json(SyncResponse { success: true }))
}
