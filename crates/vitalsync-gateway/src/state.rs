//! Gateway application state.
//!
//! This module defines the shared state that is available to all request
//! handlers.

use std::sync::Arc;

use vitalsync_auth::SessionCodec;
use vitalsync_engine::SyncService;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct AppState<C>
where
    C: SessionCodec,
{
    /// The sync service behind both API operations.
    pub service: Arc<SyncService<C>>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<C> AppState<C>
where
    C: SessionCodec,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(service: Arc<SyncService<C>>, config: GatewayConfig) -> Self {
        Self { service, config }
    }
}

impl<C> Clone for AppState<C>
where
    C: SessionCodec,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: self.config.clone(),
        }
    }
}
