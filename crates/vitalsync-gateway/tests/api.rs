//! Endpoint tests against the full router.
//!
//! These run without a database: the tenant router points at a port nothing
//! listens on, so any path that would touch the cluster fails with a 500
//! while the cheap rejections (unknown type, bad token, empty batch) are
//! exercised end to end.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use vitalsync_auth::{PlainCodec, SessionCodec};
use vitalsync_core::Username;
use vitalsync_engine::SyncService;
use vitalsync_gateway::{create_router, AppState, GatewayConfig};
use vitalsync_store::{PgConfig, Registry, TenantRouter};

fn test_server() -> TestServer {
    let config = PgConfig {
        host: "127.0.0.1".to_owned(),
        port: 1,
        ..PgConfig::default()
    };
    let service = Arc::new(SyncService::new(
        Arc::new(PlainCodec),
        Arc::new(TenantRouter::new(config)),
        Arc::new(Registry::standard()),
    ));
    let state = AppState::new(service, GatewayConfig::default());
    TestServer::new(create_router(state)).unwrap()
}

fn token() -> String {
    PlainCodec.issue(&Username::new("alice").unwrap()).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn login_rejects_invalid_username() {
    let server = test_server();
    let response = server
        .post("/api/login")
        .json(&json!({"username": "Alice!", "password": "pw"}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn sync_unknown_type_is_501() {
    let server = test_server();
    let response = server
        .post("/api/sync/BloodPressure")
        .json(&json!({
            "userid": token(),
            "data": [{"metadata": {"id": "r1"}}]
        }))
        .await;

    assert_eq!(response.status_code(), 501);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_implemented");
}

#[tokio::test]
async fn sync_empty_batch_succeeds() {
    let server = test_server();
    // No data, no database work; even the token is never inspected.
    let response = server
        .post("/api/sync/BodyFat")
        .json(&json!({"userid": "garbage"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn sync_bad_token_is_opaque_401() {
    let server = test_server();
    let response = server
        .post("/api/sync/BodyFat")
        .json(&json!({
            "userid": "garbage",
            "data": [{"metadata": {"id": "r1"}, "time": "2024-01-01T00:00:00Z", "percentage": 22.5}]
        }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["message"], "unauthorized");
}

#[tokio::test]
async fn sync_with_unreachable_cluster_is_opaque_500() {
    let server = test_server();
    let response = server
        .post("/api/sync/BodyFat")
        .json(&json!({
            "userid": token(),
            "data": [{"metadata": {"id": "r1"}, "time": "2024-01-01T00:00:00Z", "percentage": 22.5}]
        }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "internal_error");
    // Connection detail stays server-side.
    assert_eq!(body["error"]["message"], "internal error: storage error");
}
