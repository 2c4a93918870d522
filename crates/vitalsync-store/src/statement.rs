//! Upsert statement construction.
//!
//! One statement per record: an `INSERT` listing every present column with a
//! positional placeholder, and an `ON CONFLICT (id)` clause reassigning each
//! non-key column from `EXCLUDED`, so a replayed record fully replaces the
//! prior row. Identifiers come from the registry only; values are bound.

use tokio_postgres::types::ToSql;

use crate::error::{Result, StoreError};
use crate::record::SyncRecord;
use crate::registry::RecordDescriptor;
use crate::value::{quote_ident, SqlValue};

/// A built statement and its bound parameters, in placeholder order.
#[derive(Debug)]
pub struct UpsertStatement {
    /// The statement text.
    pub sql: String,
    /// The parameters, one per placeholder.
    pub params: Vec<SqlValue>,
}

impl UpsertStatement {
    /// Borrow the parameters as a bindable slice.
    #[must_use]
    pub fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(SqlValue::as_param).collect()
    }
}

/// Build the idempotent upsert for one record.
///
/// Columns are the three base columns (`id`, `metadata`, `app`) followed by
/// the descriptor's extra columns in declared order; null or absent values
/// are omitted entirely.
///
/// # Errors
///
/// Returns [`StoreError::MalformedRecord`] if the record has no
/// `metadata.id`.
pub fn build_upsert(descriptor: &RecordDescriptor, record: &SyncRecord) -> Result<UpsertStatement> {
    let id = record
        .id()
        .ok_or_else(|| StoreError::MalformedRecord("missing metadata.id".to_owned()))?;

    let mut columns: Vec<(&str, SqlValue)> = vec![
        ("id", SqlValue::Text(id.to_owned())),
        ("metadata", SqlValue::Json(record.metadata.clone())),
    ];
    if let Some(app) = record.data_origin() {
        columns.push(("app", SqlValue::Text(app.to_owned())));
    }
    columns.extend(
        descriptor
            .extract(record)
            .into_iter()
            .filter(|(_, value)| !value.is_null()),
    );

    let names: Vec<String> = columns.iter().map(|(name, _)| quote_ident(name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let updates: Vec<String> = columns
        .iter()
        .skip(1) // everything but the key
        .map(|(name, _)| {
            let ident = quote_ident(name);
            format!("{ident} = EXCLUDED.{ident}")
        })
        .collect();

    // A record carrying nothing but its id has no columns to reassign.
    let conflict_action = if updates.is_empty() {
        "DO NOTHING".to_owned()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT (\"id\") {}",
        quote_ident(descriptor.table()),
        names.join(", "),
        placeholders.join(", "),
        conflict_action,
    );

    let params = columns.into_iter().map(|(_, value)| value).collect();
    Ok(UpsertStatement { sql, params })
}
