//! The inbound wire record.
//!
//! One [`SyncRecord`] is one item of a sync batch: a `metadata` object
//! carrying the primary key and origin app, plus record-type-specific
//! fields at the top level. Records are ephemeral; each is consumed by a
//! single upsert.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// A single health record as received from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncRecord {
    /// The record metadata: `id` (primary key) and `dataOrigin` (app tag).
    /// Stored verbatim in the destination table's `metadata` JSONB column.
    #[serde(default)]
    pub metadata: JsonValue,

    /// Record-type-specific fields, keyed by their wire names.
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

impl SyncRecord {
    /// The record's primary key, from `metadata.id`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.metadata.get("id").and_then(JsonValue::as_str)
    }

    /// The origin app tag, from `metadata.dataOrigin`.
    #[must_use]
    pub fn data_origin(&self) -> Option<&str> {
        self.metadata.get("dataOrigin").and_then(JsonValue::as_str)
    }

    /// Look up a top-level wire field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }
}
