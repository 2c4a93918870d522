//! The record type registry.
//!
//! This module defines the static table of supported record types. Each
//! entry maps a record type name (e.g. `"BodyFat"`) to its destination
//! table, its extra columns in declared order, and how each column's value
//! is pulled from the wire record. Unknown names are a hard rejection at
//! the sync engine; nothing here is derived from untrusted input.
//!
//! Descriptors are composed from named field groups (time interval, energy
//! quantity, mass quantity, ...) rather than per-type field lists, so the
//! shared shapes are declared exactly once.

use std::collections::HashMap;

use crate::record::SyncRecord;
use crate::value::{ColumnType, SqlValue};

/// Where a column's value lives in the wire record.
#[derive(Debug, Clone, Copy)]
enum WireSource {
    /// A top-level field, e.g. `time`.
    Field(&'static str),
    /// One key of a nested quantity object, e.g. `energy.inKilocalories`.
    Nested(&'static str, &'static str),
}

/// One extra column of a destination table.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    name: &'static str,
    ty: ColumnType,
    source: WireSource,
}

impl ColumnSpec {
    const fn field(name: &'static str, ty: ColumnType, wire: &'static str) -> Self {
        Self {
            name,
            ty,
            source: WireSource::Field(wire),
        }
    }

    const fn nested(
        name: &'static str,
        ty: ColumnType,
        wire: &'static str,
        key: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            source: WireSource::Nested(wire, key),
        }
    }

    /// The column name (store identifier convention, snake_case).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared SQL type.
    #[must_use]
    pub const fn ty(&self) -> ColumnType {
        self.ty
    }

    /// Pull this column's value out of a wire record.
    #[must_use]
    pub fn extract(&self, record: &SyncRecord) -> SqlValue {
        let value = match self.source {
            WireSource::Field(wire) => record.field(wire),
            WireSource::Nested(wire, key) => record.field(wire).and_then(|v| v.get(key)),
        };
        SqlValue::from_wire(value, self.ty)
    }
}

// =============================================================================
// Field groups
// =============================================================================

/// Records measured at a single instant: `time`.
fn instant() -> Vec<ColumnSpec> {
    vec![ColumnSpec::field("time", ColumnType::TimestampTz, "time")]
}

/// Records spanning an interval: `startTime`/`endTime`.
fn interval() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::field("start_time", ColumnType::TimestampTz, "startTime"),
        ColumnSpec::field("end_time", ColumnType::TimestampTz, "endTime"),
    ]
}

/// An energy quantity in kilocalories.
fn energy() -> Vec<ColumnSpec> {
    vec![ColumnSpec::nested(
        "energy_kcal",
        ColumnType::DoublePrecision,
        "energy",
        "inKilocalories",
    )]
}

/// A mass quantity in kilograms.
fn mass(column: &'static str, wire: &'static str) -> Vec<ColumnSpec> {
    vec![ColumnSpec::nested(
        column,
        ColumnType::DoublePrecision,
        wire,
        "inKilograms",
    )]
}

/// A length quantity in meters.
fn length(column: &'static str, wire: &'static str) -> Vec<ColumnSpec> {
    vec![ColumnSpec::nested(
        column,
        ColumnType::DoublePrecision,
        wire,
        "inMeters",
    )]
}

/// A volume quantity in liters.
fn volume(column: &'static str, wire: &'static str) -> Vec<ColumnSpec> {
    vec![ColumnSpec::nested(
        column,
        ColumnType::DoublePrecision,
        wire,
        "inLiters",
    )]
}

// =============================================================================
// Descriptors
// =============================================================================

/// An immutable description of one record type.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    name: &'static str,
    table: String,
    columns: Vec<ColumnSpec>,
}

impl RecordDescriptor {
    fn new(name: &'static str, groups: &[Vec<ColumnSpec>]) -> Self {
        Self {
            name,
            table: table_name(name),
            columns: groups.concat(),
        }
    }

    /// The record type name, case-sensitive (registry convention).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The destination table name (store convention, snake_case).
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The extra columns, in declared order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Transform a wire record into this type's extra column values.
    ///
    /// Total over any record: missing or unconvertible fields yield
    /// [`SqlValue::Null`] and are later omitted from the statement.
    #[must_use]
    pub fn extract(&self, record: &SyncRecord) -> Vec<(&'static str, SqlValue)> {
        self.columns
            .iter()
            .map(|column| (column.name, column.extract(record)))
            .collect()
    }
}

/// Translate a registry name to the store's identifier convention:
/// `BodyFat` → `body_fat`. The mapping is reversible for all registered
/// names because they are strict CamelCase.
#[must_use]
pub fn table_name(record_type: &str) -> String {
    let mut out = String::with_capacity(record_type.len() + 4);
    for (i, c) in record_type.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// The static, case-sensitive record type registry.
///
/// Built once at startup and passed explicitly to the sync engine; there is
/// no ambient global registry.
pub struct Registry {
    types: HashMap<&'static str, RecordDescriptor>,
}

impl Registry {
    /// Build the standard registry of supported health record types.
    #[must_use]
    pub fn standard() -> Self {
        let entries = vec![
            RecordDescriptor::new("ActiveCaloriesBurned", &[interval(), energy()]),
            RecordDescriptor::new(
                "BodyFat",
                &[
                    instant(),
                    vec![ColumnSpec::field(
                        "percentage",
                        ColumnType::DoublePrecision,
                        "percentage",
                    )],
                ],
            ),
            RecordDescriptor::new("Distance", &[interval(), length("distance_m", "distance")]),
            RecordDescriptor::new(
                "ExerciseSession",
                &[
                    interval(),
                    vec![
                        ColumnSpec::field("exercise_type", ColumnType::BigInt, "exerciseType"),
                        ColumnSpec::field("title", ColumnType::Text, "title"),
                        ColumnSpec::field("notes", ColumnType::Text, "notes"),
                    ],
                ],
            ),
            RecordDescriptor::new(
                "HeartRate",
                &[
                    interval(),
                    vec![ColumnSpec::field("samples", ColumnType::Jsonb, "samples")],
                ],
            ),
            RecordDescriptor::new("Height", &[instant(), length("height_m", "height")]),
            RecordDescriptor::new("Hydration", &[interval(), volume("volume_l", "volume")]),
            RecordDescriptor::new(
                "SleepSession",
                &[
                    interval(),
                    vec![
                        ColumnSpec::field("stages", ColumnType::Jsonb, "stages"),
                        ColumnSpec::field("title", ColumnType::Text, "title"),
                        ColumnSpec::field("notes", ColumnType::Text, "notes"),
                    ],
                ],
            ),
            RecordDescriptor::new(
                "Steps",
                &[
                    interval(),
                    vec![ColumnSpec::field("count", ColumnType::BigInt, "count")],
                ],
            ),
            RecordDescriptor::new("TotalCaloriesBurned", &[interval(), energy()]),
            RecordDescriptor::new("Weight", &[instant(), mass("weight_kg", "weight")]),
        ];

        let types = entries
            .into_iter()
            .map(|descriptor| (descriptor.name, descriptor))
            .collect();
        Self { types }
    }

    /// Look up a record type by its case-sensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordDescriptor> {
        self.types.get(name)
    }

    /// The number of registered record types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_names_are_snake_case() {
        assert_eq!(table_name("BodyFat"), "body_fat");
        assert_eq!(table_name("Steps"), "steps");
        assert_eq!(
            table_name("ActiveCaloriesBurned"),
            "active_calories_burned"
        );
        assert_eq!(table_name("HeartRate"), "heart_rate");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = Registry::standard();
        assert!(registry.get("BodyFat").is_some());
        assert!(registry.get("bodyfat").is_none());
        assert!(registry.get("bodyFat").is_none());
    }

    #[test]
    fn unknown_types_are_absent() {
        let registry = Registry::standard();
        assert!(registry.get("BloodPressure").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn body_fat_descriptor_shape() {
        let registry = Registry::standard();
        let descriptor = registry.get("BodyFat").unwrap();
        assert_eq!(descriptor.table(), "body_fat");
        let names: Vec<&str> = descriptor.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["time", "percentage"]);
    }

    #[test]
    fn extract_pulls_declared_fields() {
        let registry = Registry::standard();
        let descriptor = registry.get("BodyFat").unwrap();
        let record: SyncRecord = serde_json::from_value(json!({
            "metadata": {"id": "r1", "dataOrigin": "app1"},
            "time": "2024-01-01T00:00:00Z",
            "percentage": 22.5
        }))
        .unwrap();

        let values = descriptor.extract(&record);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].0, "time");
        assert!(matches!(values[0].1, SqlValue::Timestamp(_)));
        assert_eq!(values[1], ("percentage", SqlValue::Float(22.5)));
    }

    #[test]
    fn extract_reads_nested_quantities() {
        let registry = Registry::standard();
        let descriptor = registry.get("Weight").unwrap();
        let record: SyncRecord = serde_json::from_value(json!({
            "metadata": {"id": "w1"},
            "time": "2024-01-01T00:00:00Z",
            "weight": {"inKilograms": 81.2}
        }))
        .unwrap();

        let values = descriptor.extract(&record);
        assert!(values.contains(&("weight_kg", SqlValue::Float(81.2))));
    }

    #[test]
    fn extract_is_total_over_sparse_records() {
        let registry = Registry::standard();
        let descriptor = registry.get("ExerciseSession").unwrap();
        let record: SyncRecord = serde_json::from_value(json!({
            "metadata": {"id": "e1"},
            "startTime": "2024-01-01T07:00:00Z"
        }))
        .unwrap();

        let values = descriptor.extract(&record);
        // Every declared column is present; undeclared ones are NULL.
        assert_eq!(values.len(), descriptor.columns().len());
        assert!(matches!(values[0].1, SqlValue::Timestamp(_)));
        assert!(values[1].1.is_null());
    }
}
