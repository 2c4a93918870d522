//! HTTP gateway for the vitalsync health-metric sync service.
//!
//! This crate provides the public-facing API for tenant login and record
//! sync. It handles:
//!
//! - Encrypted session token issuance and verification
//! - REST HTTP endpoints for login and per-type record sync
//! - Request body limits, timeouts, and CORS
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Clients                              │
//! │                    (HTTP, JSON bodies)                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     vitalsync-gateway                       │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   Router    │ │  Handlers   │ │    Error mapping    │    │
//! │  │ + Middleware│ │ login/sync  │ │    (opaque 401s)    │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┼──────────────┐
//!               ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │  Engine  │   │  Auth    │   │ Postgres │
//!        │ (sync)   │   │ (AES-GCM)│   │ (tenant  │
//!        │          │   │          │   │   DBs)   │
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitalsync_auth::AesGcmCodec;
//! use vitalsync_engine::SyncService;
//! use vitalsync_gateway::{create_router, AppState, GatewayConfig};
//! use vitalsync_store::{PgConfig, Registry, TenantRouter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = Arc::new(AesGcmCodec::new(b"very very secretvery very secret")?);
//! let router = Arc::new(TenantRouter::new(PgConfig::from_env()));
//! let registry = Arc::new(Registry::standard());
//! let service = Arc::new(SyncService::new(codec, router, registry));
//!
//! let state = AppState::new(service, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
