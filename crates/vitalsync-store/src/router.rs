//! The tenant connection router.
//!
//! Maps a username to a live, role-scoped connection to that tenant's
//! private database, creating and caching it on first use. The cache is
//! process-local; after a restart the next request simply provisions a new
//! connection. Entries are never evicted or health-checked: a broken
//! connection surfaces as a query error and the caller's retry opens a
//! fresh one after the process restarts.
//!
//! Creation is guarded per username so that concurrent first requests from
//! the same tenant open exactly one connection, while different tenants
//! never block each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio_postgres::{Client, Config, NoTls};

use vitalsync_core::Username;

use crate::error::{Result, StoreError};
use crate::value::quote_ident;

/// The maintenance database used for role checks and provisioning.
pub const MAINTENANCE_DB: &str = "postgres";

/// Connection settings for the PostgreSQL cluster.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// Cluster host.
    pub host: String,
    /// Cluster port.
    pub port: u16,
    /// The service's administrative role. New tenant roles are granted to
    /// this role so the service can `SET ROLE` into them.
    pub admin_user: String,
    /// The administrative role's password.
    pub admin_password: String,
    /// Prefix for tenant database names: `db name = prefix + username`.
    pub db_prefix: String,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 5432,
            admin_user: "postgres".to_owned(),
            admin_password: String::new(),
            db_prefix: "hcg-".to_owned(),
        }
    }
}

impl PgConfig {
    /// Read the configuration from `PGHOST`, `PGPORT`, `PGUSER`,
    /// `PGPASSWORD`, and `DB_PREFIX`, with defaults for any that are unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("PGHOST").unwrap_or(defaults.host),
            port: std::env::var("PGPORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            admin_user: std::env::var("PGUSER").unwrap_or(defaults.admin_user),
            admin_password: std::env::var("PGPASSWORD").unwrap_or(defaults.admin_password),
            db_prefix: std::env::var("DB_PREFIX").unwrap_or(defaults.db_prefix),
        }
    }

    /// The tenant's private database name.
    #[must_use]
    pub fn database_name(&self, username: &Username) -> String {
        format!("{}{}", self.db_prefix, username.as_str())
    }
}

/// Open a connection to `dbname` as `user`, spawning its driver task.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] if the connection cannot be
/// established or authenticated.
pub async fn connect(
    config: &PgConfig,
    dbname: &str,
    user: &str,
    password: &str,
) -> Result<Client> {
    let (client, connection) = Config::new()
        .host(&config.host)
        .port(config.port)
        .user(user)
        .password(password)
        .dbname(dbname)
        .connect(NoTls)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    let dbname = dbname.to_owned();
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!(database = %dbname, error = %e, "database connection closed");
        }
    });

    Ok(client)
}

/// An authenticated, role-scoped handle to one tenant's database.
///
/// Owned exclusively by the [`TenantRouter`]; statements through it run
/// sequentially, so concurrent requests from the same user serialize at the
/// connection.
pub struct TenantConnection {
    client: Client,
    ensured_tables: tokio::sync::Mutex<std::collections::HashSet<String>>,
}

impl TenantConnection {
    fn new(client: Client) -> Self {
        Self {
            client,
            ensured_tables: tokio::sync::Mutex::new(std::collections::HashSet::new()),
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The set of tables already ensured on this connection.
    ///
    /// Held across the DDL itself so concurrent first writers for the same
    /// table serialize here.
    pub(crate) fn ensured_tables(
        &self,
    ) -> &tokio::sync::Mutex<std::collections::HashSet<String>> {
        &self.ensured_tables
    }
}

/// The per-tenant connection cache.
pub struct TenantRouter {
    config: PgConfig,
    connections: RwLock<HashMap<Username, Arc<TenantConnection>>>,
    // Per-username creation gates: single-flight for cache misses.
    creating: Mutex<HashMap<Username, Arc<tokio::sync::Mutex<()>>>>,
}

impl TenantRouter {
    /// Create a router for the given cluster configuration.
    #[must_use]
    pub fn new(config: PgConfig) -> Self {
        Self {
            config,
            connections: RwLock::new(HashMap::new()),
            creating: Mutex::new(HashMap::new()),
        }
    }

    /// The router's cluster configuration.
    #[must_use]
    pub const fn config(&self) -> &PgConfig {
        &self.config
    }

    /// Number of currently cached tenant connections.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.connections.read().len()
    }

    /// Return the tenant's connection, opening and caching it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the connection or role switch
    /// fails; nothing is cached on failure, so the next call retries from
    /// scratch.
    pub async fn connection_for(&self, username: &Username) -> Result<Arc<TenantConnection>> {
        if let Some(connection) = self.connections.read().get(username) {
            return Ok(Arc::clone(connection));
        }

        let gate = {
            let mut creating = self.creating.lock();
            Arc::clone(
                creating
                    .entry(username.clone())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        let _guard = gate.lock().await;

        // Another request may have finished creating while we waited.
        if let Some(connection) = self.connections.read().get(username) {
            return Ok(Arc::clone(connection));
        }

        let connection = Arc::new(self.open(username).await?);
        self.connections
            .write()
            .insert(username.clone(), Arc::clone(&connection));
        Ok(connection)
    }

    /// Open a fresh connection to the tenant's database and scope it to
    /// their role.
    async fn open(&self, username: &Username) -> Result<TenantConnection> {
        let database = self.config.database_name(username);
        tracing::debug!(user = %username, database = %database, "opening tenant connection");

        let client = connect(
            &self.config,
            &database,
            &self.config.admin_user,
            &self.config.admin_password,
        )
        .await?;

        // Scope every subsequent statement to the tenant's own role. The
        // identifier is safe to splice: usernames are validated to the
        // narrow role-name alphabet at construction.
        let set_role = format!("SET ROLE {}", quote_ident(username.as_str()));
        tracing::debug!(sql = %set_role, "switching role");
        client
            .batch_execute(&set_role)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(TenantConnection::new(client))
    }
}
