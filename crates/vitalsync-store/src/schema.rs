//! Lazy, idempotent table creation.
//!
//! Destination tables are created the first time a record type is written
//! to a tenant database, from the registry's declared columns. `CREATE
//! TABLE IF NOT EXISTS` makes the operation race-tolerant at the store even
//! if two processes ensure the same brand-new table concurrently; within a
//! process, the connection's ensured set is held across the DDL so only one
//! request issues it.

use crate::error::{Result, StoreError};
use crate::registry::RecordDescriptor;
use crate::router::TenantConnection;
use crate::value::quote_ident;

/// Build the DDL for a record type's destination table: the three base
/// columns followed by the descriptor's extra columns in declared order.
#[must_use]
pub fn create_table_sql(descriptor: &RecordDescriptor) -> String {
    let mut columns = vec![
        "\"id\" TEXT PRIMARY KEY".to_owned(),
        "\"metadata\" JSONB".to_owned(),
        "\"app\" TEXT".to_owned(),
    ];
    columns.extend(
        descriptor
            .columns()
            .iter()
            .map(|column| format!("{} {}", quote_ident(column.name()), column.ty().ddl())),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(descriptor.table()),
        columns.join(", ")
    )
}

/// Ensure the destination table for a record type exists on this tenant
/// connection. Safe to call on every request; the DDL is issued at most
/// once per table per connection.
///
/// # Errors
///
/// Returns [`StoreError::Schema`] if the DDL fails (e.g. a permission
/// error), which aborts the caller's batch.
pub async fn ensure_table(
    connection: &TenantConnection,
    descriptor: &RecordDescriptor,
) -> Result<()> {
    let mut ensured = connection.ensured_tables().lock().await;
    if ensured.contains(descriptor.table()) {
        return Ok(());
    }

    let ddl = create_table_sql(descriptor);
    tracing::debug!(sql = %ddl, "ensuring destination table");
    connection
        .client()
        .batch_execute(&ddl)
        .await
        .map_err(|e| StoreError::Schema(e.to_string()))?;

    ensured.insert(descriptor.table().to_owned());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn body_fat_ddl() {
        let registry = Registry::standard();
        let descriptor = registry.get("BodyFat").unwrap();
        assert_eq!(
            create_table_sql(descriptor),
            "CREATE TABLE IF NOT EXISTS \"body_fat\" (\
             \"id\" TEXT PRIMARY KEY, \
             \"metadata\" JSONB, \
             \"app\" TEXT, \
             \"time\" TIMESTAMPTZ, \
             \"percentage\" DOUBLE PRECISION)"
        );
    }

    #[test]
    fn extra_columns_follow_declared_order() {
        let registry = Registry::standard();
        let descriptor = registry.get("ExerciseSession").unwrap();
        let ddl = create_table_sql(descriptor);

        let start = ddl.find("\"start_time\"").unwrap();
        let end = ddl.find("\"end_time\"").unwrap();
        let exercise_type = ddl.find("\"exercise_type\"").unwrap();
        let title = ddl.find("\"title\"").unwrap();
        assert!(start < end && end < exercise_type && exercise_type < title);
    }

    #[test]
    fn ddl_is_create_if_not_exists() {
        let registry = Registry::standard();
        for name in ["Steps", "Weight", "HeartRate"] {
            let descriptor = registry.get(name).unwrap();
            assert!(create_table_sql(descriptor).starts_with("CREATE TABLE IF NOT EXISTS"));
        }
    }
}
