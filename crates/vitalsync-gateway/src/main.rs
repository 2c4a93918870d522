//! Vitalsync Gateway - HTTP API for the health-metric sync service.
//!
//! This is the main entry point for the gateway service. It wires the
//! session codec, the tenant connection router, and the record registry
//! into the sync service and serves the HTTP API.
//!
//! # Configuration
//!
//! - `LISTEN_ADDR` - bind address (default `0.0.0.0:3000`)
//! - `CORS_ORIGINS` - comma-separated allowed origins (default `*`)
//! - `SESSION_KEY` - 32-byte AES-256-GCM session key; a well-known
//!   development key is used if unset
//! - `PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`, `DB_PREFIX` - cluster
//!   settings for the tenant databases

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitalsync_auth::AesGcmCodec;
use vitalsync_engine::SyncService;
use vitalsync_gateway::{create_router, AppState, GatewayConfig};
use vitalsync_store::{PgConfig, Registry, TenantRouter};

/// The development fallback key. Fine for local hacking, never for
/// production; its use is loudly logged (the key itself never is).
const DEV_SESSION_KEY: &[u8] = b"very very secretvery very secret";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vitalsync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vitalsync Gateway");

    // Load configuration from environment
    let gateway_config = GatewayConfig::from_env();
    let pg_config = PgConfig::from_env();

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        pg_host = %pg_config.host,
        pg_port = pg_config.port,
        db_prefix = %pg_config.db_prefix,
        "Gateway configuration loaded"
    );

    // Initialize the session codec. The key is read here and moved
    // straight into the cipher; it is never logged.
    let codec = match std::env::var("SESSION_KEY") {
        Ok(key) => Arc::new(AesGcmCodec::new(key.as_bytes())?),
        Err(_) => {
            tracing::warn!("SESSION_KEY not set - using the development key");
            Arc::new(AesGcmCodec::new(DEV_SESSION_KEY)?)
        }
    };

    // Initialize the tenant router and record registry
    let router = Arc::new(TenantRouter::new(pg_config));
    let registry = Arc::new(Registry::standard());
    tracing::info!(
        record_types = registry.len(),
        "Record type registry initialized"
    );

    let service = Arc::new(SyncService::new(codec, router, registry));

    // Create the full router with all API endpoints
    let state = AppState::new(service, gateway_config.clone());
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %gateway_config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&gateway_config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
