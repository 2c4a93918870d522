//! The sync pipeline.
//!
//! One call per inbound batch: authenticate the token, route to the
//! tenant's connection, ensure the destination table, and upsert each
//! record in array order. The cheap rejections (empty batch, unknown
//! record type) happen before any token work or database I/O.

use vitalsync_store::{build_upsert, ensure_table, SyncRecord};

use crate::error::{EngineError, Result};
use crate::service::SyncService;
use vitalsync_auth::SessionCodec;

impl<C: SessionCodec> SyncService<C> {
    /// Persist a batch of records of one type for the token's tenant.
    ///
    /// Records are upserted in array order; a replayed record (same
    /// `metadata.id`) fully replaces the prior row. A failing record
    /// aborts the rest of the batch.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownRecordType`] if the type is not registered
    ///   (checked before any database I/O)
    /// - [`EngineError::Unauthenticated`] if the token does not resolve
    /// - [`EngineError::Store`] for connection, schema, malformed-record,
    ///   or query failures
    pub async fn sync(
        &self,
        token: &str,
        record_type: &str,
        records: &[SyncRecord],
    ) -> Result<()> {
        if records.is_empty() {
            tracing::debug!(record_type, "empty sync batch");
            return Ok(());
        }

        let descriptor = self
            .registry()
            .get(record_type)
            .ok_or_else(|| EngineError::UnknownRecordType(record_type.to_owned()))?;

        let username = self.codec().resolve(token)?;
        tracing::info!(
            user = %username,
            record_type,
            count = records.len(),
            "syncing batch"
        );

        let connection = self.router().connection_for(&username).await?;
        ensure_table(&connection, descriptor).await?;

        for record in records {
            let statement = build_upsert(descriptor, record)?;
            tracing::debug!(table = %descriptor.table(), sql = %statement.sql, "upserting record");
            connection
                .client()
                .execute(statement.sql.as_str(), &statement.param_refs())
                .await
                .map_err(|e| vitalsync_store::StoreError::Query(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SyncService;
    use serde_json::json;
    use std::sync::Arc;
    use vitalsync_auth::PlainCodec;
    use vitalsync_core::Username;
    use vitalsync_store::{PgConfig, Registry, TenantRouter};

    /// A service whose router points at a port nothing listens on: any
    /// attempt to open a tenant connection fails loudly, so these tests
    /// prove which paths perform no database I/O.
    fn service() -> SyncService<PlainCodec> {
        let config = PgConfig {
            host: "127.0.0.1".to_owned(),
            port: 1,
            ..PgConfig::default()
        };
        SyncService::new(
            Arc::new(PlainCodec),
            Arc::new(TenantRouter::new(config)),
            Arc::new(Registry::standard()),
        )
    }

    fn token() -> String {
        PlainCodec.issue(&Username::new("alice").unwrap()).unwrap()
    }

    fn record() -> SyncRecord {
        serde_json::from_value(json!({
            "metadata": {"id": "r1", "dataOrigin": "app1"},
            "time": "2024-01-01T00:00:00Z",
            "percentage": 22.5
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn empty_batch_succeeds_without_connection() {
        let service = service();
        // Even a garbage token succeeds: the empty batch short-circuits
        // before authentication and before any connection is opened.
        service.sync("not-a-token", "BodyFat", &[]).await.unwrap();
        assert_eq!(service.router().cached(), 0);
    }

    #[tokio::test]
    async fn unknown_type_rejects_before_io() {
        let service = service();
        let result = service.sync(&token(), "BloodPressure", &[record()]).await;
        assert!(matches!(
            result,
            Err(EngineError::UnknownRecordType(name)) if name == "BloodPressure"
        ));
        assert_eq!(service.router().cached(), 0);
    }

    #[tokio::test]
    async fn bad_token_rejects_before_io() {
        let service = service();
        let result = service.sync("garbage", "BodyFat", &[record()]).await;
        assert!(matches!(result, Err(EngineError::Unauthenticated(_))));
        assert_eq!(service.router().cached(), 0);
    }

    #[tokio::test]
    async fn valid_request_reaches_the_router() {
        let service = service();
        // With checks passed, the pipeline proceeds to connection
        // establishment, which fails against the dead port.
        let result = service.sync(&token(), "BodyFat", &[record()]).await;
        assert!(matches!(
            result,
            Err(EngineError::Store(vitalsync_store::StoreError::Connection(_)))
        ));
    }
}
