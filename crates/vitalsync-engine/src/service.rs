//! The sync service.
//!
//! [`SyncService`] bundles the three process-scoped collaborators — the
//! session codec, the tenant connection router, and the record type
//! registry — constructed once at startup and passed in explicitly. The
//! operations live in sibling modules: [`crate::sync`] for the record
//! pipeline and [`crate::account`] for login/provisioning.

use std::sync::Arc;

use vitalsync_auth::SessionCodec;
use vitalsync_store::{Registry, TenantRouter};

/// The service behind both API operations, generic over the session codec
/// so tests can substitute a deterministic one.
pub struct SyncService<C: SessionCodec> {
    codec: Arc<C>,
    router: Arc<TenantRouter>,
    registry: Arc<Registry>,
}

impl<C: SessionCodec> SyncService<C> {
    /// Assemble a service from its collaborators.
    #[must_use]
    pub fn new(codec: Arc<C>, router: Arc<TenantRouter>, registry: Arc<Registry>) -> Self {
        Self {
            codec,
            router,
            registry,
        }
    }

    /// The session codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The tenant connection router.
    #[must_use]
    pub fn router(&self) -> &TenantRouter {
        &self.router
    }

    /// The record type registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
