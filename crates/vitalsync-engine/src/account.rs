//! Login and tenant provisioning.
//!
//! A first-time username gets a fresh database role and a private database
//! owned by that role; a returning username is authenticated by opening
//! their database with the supplied password as the role credential. Both
//! paths end with an issued session token.
//!
//! The role and database names are spliced as identifiers, which is safe
//! only because [`Username`] restricts the alphabet; the password is the
//! one value that must travel inside a DDL statement (`CREATE ROLE` takes
//! no bound parameters) and is escaped as a quoted literal. Passwords are
//! never logged.

use vitalsync_core::Username;
use vitalsync_store::{connect, quote_ident, quote_literal, StoreError, MAINTENANCE_DB};

use crate::error::{EngineError, Result};
use crate::service::SyncService;
use vitalsync_auth::SessionCodec;

impl<C: SessionCodec> SyncService<C> {
    /// Authenticate or provision a tenant and issue a session token.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidUsername`] if the name fails validation
    /// - [`EngineError::Unauthorized`] if the role exists and the password
    ///   does not open its database
    /// - [`EngineError::Store`] if the maintenance connection or the
    ///   provisioning DDL fails
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let username = Username::new(username)?;
        let config = self.router().config();

        let admin = connect(
            config,
            MAINTENANCE_DB,
            &config.admin_user,
            &config.admin_password,
        )
        .await?;

        let existing = admin
            .query_opt(
                "SELECT 1 FROM pg_roles WHERE rolname = $1",
                &[&username.as_str()],
            )
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let database = config.database_name(&username);

        if existing.is_some() {
            // Returning tenant: the supplied password must open their own
            // database as their own role. The probe connection is dropped;
            // the router provisions its cached connection lazily.
            match connect(config, &database, username.as_str(), password).await {
                Ok(_probe) => {
                    tracing::info!(user = %username, "login");
                }
                Err(e) => {
                    tracing::debug!(user = %username, error = %e, "login probe failed");
                    return Err(EngineError::Unauthorized);
                }
            }
        } else {
            tracing::info!(user = %username, database = %database, "provisioning new tenant");
            let role = quote_ident(username.as_str());

            admin
                .batch_execute(&format!(
                    "CREATE ROLE {role} WITH LOGIN ENCRYPTED PASSWORD {}",
                    quote_literal(password)
                ))
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

            // Membership lets the service SET ROLE into the tenant.
            admin
                .batch_execute(&format!(
                    "GRANT {role} TO {}",
                    quote_ident(&config.admin_user)
                ))
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

            admin
                .batch_execute(&format!(
                    "CREATE DATABASE {} OWNER {role}",
                    quote_ident(&database)
                ))
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        Ok(self.codec().issue(&username)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SyncService;
    use std::sync::Arc;
    use vitalsync_auth::PlainCodec;
    use vitalsync_store::{PgConfig, Registry, TenantRouter};

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

    #[tokio::test]
    async fn invalid_username_rejected_before_io() {
        let service = service();
        let result = service.login("Alice; DROP ROLE admin", "pw").await;
        assert!(matches!(result, Err(EngineError::InvalidUsername(_))));
    }

    #[tokio::test]
    async fn unreachable_cluster_is_a_store_error() {
        let service = service();
        let result = service.login("alice", "pw1").await;
        assert!(matches!(
            result,
            Err(EngineError::Store(StoreError::Connection(_)))
        ));
    }
}
