//! PostgreSQL storage layer for vitalsync.
//!
//! This crate owns everything between the sync engine and the relational
//! store:
//!
//! - `value`: typed SQL parameter values and identifier quoting
//! - `registry`: the static record-type registry and its field groups
//! - `record`: the inbound wire record
//! - `statement`: upsert statement construction
//! - `router`: the per-tenant connection cache
//! - `schema`: lazy destination-table creation
//!
//! Each tenant owns a private database; the router hands out one cached,
//! role-scoped connection per tenant, and the schema manager creates each
//! record type's table on first write.
//!
//! # Example
//!
//! ```
//! use vitalsync_store::{build_upsert, Registry, SyncRecord};
//!
//! let registry = Registry::standard();
//! let descriptor = registry.get("BodyFat").unwrap();
//! let record: SyncRecord = serde_json::from_value(serde_json::json!({
//!     "metadata": {"id": "r1", "dataOrigin": "app1"},
//!     "time": "2024-01-01T00:00:00Z",
//!     "percentage": 22.5
//! }))
//! .unwrap();
//!
//! let statement = build_upsert(descriptor, &record).unwrap();
//! assert!(statement.sql.starts_with("INSERT INTO \"body_fat\""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod record;
pub mod registry;
pub mod router;
pub mod schema;
pub mod statement;
pub mod value;

pub use error::{Result, StoreError};
pub use record::SyncRecord;
pub use registry::{table_name, ColumnSpec, RecordDescriptor, Registry};
pub use router::{connect, PgConfig, TenantConnection, TenantRouter, MAINTENANCE_DB};
pub use schema::{create_table_sql, ensure_table};
pub use statement::{build_upsert, UpsertStatement};
pub use value::{quote_ident, quote_literal, ColumnType, SqlValue};
