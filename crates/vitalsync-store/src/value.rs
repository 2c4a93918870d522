//! Typed SQL values and identifier quoting.
//!
//! Record field values travel as [`SqlValue`]s and are bound as positional
//! parameters, never interpolated into statement text. Dynamic statement
//! text is built only from identifiers, which come from the static registry
//! or the validated username alphabet; [`quote_ident`] guards those, and
//! [`quote_literal`] exists for the one statement that cannot take bound
//! parameters (`CREATE ROLE ... PASSWORD`).

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tokio_postgres::types::ToSql;

/// The SQL column types the registry can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `TEXT`
    Text,
    /// `DOUBLE PRECISION`
    DoublePrecision,
    /// `BIGINT`
    BigInt,
    /// `BOOLEAN`
    Boolean,
    /// `TIMESTAMPTZ`
    TimestampTz,
    /// `JSONB`
    Jsonb,
    /// `TEXT[]`
    TextArray,
}

impl ColumnType {
    /// The DDL spelling of this type.
    #[must_use]
    pub const fn ddl(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::DoublePrecision => "DOUBLE PRECISION",
            Self::BigInt => "BIGINT",
            Self::Boolean => "BOOLEAN",
            Self::TimestampTz => "TIMESTAMPTZ",
            Self::Jsonb => "JSONB",
            Self::TextArray => "TEXT[]",
        }
    }
}

/// A value ready to be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// A text value.
    Text(String),
    /// A double-precision float.
    Float(f64),
    /// A 64-bit integer.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// A timestamp with time zone.
    Timestamp(DateTime<Utc>),
    /// A JSONB document.
    Json(JsonValue),
    /// A text array.
    TextArray(Vec<String>),
    /// SQL NULL. Null-valued columns are omitted from statements entirely.
    Null,
}

static NULL_TEXT: Option<String> = None;

impl SqlValue {
    /// Whether this value is SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow this value as a bindable statement parameter.
    #[must_use]
    pub fn as_param(&self) -> &(dyn ToSql + Sync) {
        match self {
            Self::Text(v) => v,
            Self::Float(v) => v,
            Self::Int(v) => v,
            Self::Bool(v) => v,
            Self::Timestamp(v) => v,
            Self::Json(v) => v,
            Self::TextArray(v) => v,
            Self::Null => &NULL_TEXT,
        }
    }

    /// Convert a wire JSON value into the parameter form for a declared
    /// column type.
    ///
    /// The conversion is total: absent, null, and unconvertible values all
    /// become [`SqlValue::Null`], which the statement builder then omits,
    /// matching the original pipeline's treatment of falsy fields.
    #[must_use]
    pub fn from_wire(value: Option<&JsonValue>, ty: ColumnType) -> Self {
        let Some(value) = value else {
            return Self::Null;
        };
        if value.is_null() {
            return Self::Null;
        }
        match ty {
            ColumnType::Text => match value {
                JsonValue::String(s) => Self::Text(s.clone()),
                // Structured values destined for a text column are carried
                // as their JSON serialization.
                other => Self::Text(other.to_string()),
            },
            ColumnType::DoublePrecision => value.as_f64().map_or(Self::Null, Self::Float),
            ColumnType::BigInt => value.as_i64().map_or(Self::Null, Self::Int),
            ColumnType::Boolean => value.as_bool().map_or(Self::Null, Self::Bool),
            ColumnType::TimestampTz => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map_or(Self::Null, |t| Self::Timestamp(t.with_timezone(&Utc))),
            ColumnType::Jsonb => Self::Json(value.clone()),
            ColumnType::TextArray => match value {
                JsonValue::Array(items) => {
                    let strings: Option<Vec<String>> = items
                        .iter()
                        .map(|item| item.as_str().map(str::to_owned))
                        .collect();
                    strings.map_or(Self::Null, Self::TextArray)
                }
                _ => Self::Null,
            },
        }
    }
}

/// Quote a SQL identifier, doubling embedded double quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL string literal, doubling embedded single quotes.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_absent_are_null() {
        assert!(SqlValue::from_wire(None, ColumnType::Text).is_null());
        assert!(SqlValue::from_wire(Some(&JsonValue::Null), ColumnType::Jsonb).is_null());
    }

    #[test]
    fn scalars_convert() {
        assert_eq!(
            SqlValue::from_wire(Some(&json!("hello")), ColumnType::Text),
            SqlValue::Text("hello".to_owned())
        );
        assert_eq!(
            SqlValue::from_wire(Some(&json!(22.5)), ColumnType::DoublePrecision),
            SqlValue::Float(22.5)
        );
        assert_eq!(
            SqlValue::from_wire(Some(&json!(1200)), ColumnType::BigInt),
            SqlValue::Int(1200)
        );
        assert_eq!(
            SqlValue::from_wire(Some(&json!(true)), ColumnType::Boolean),
            SqlValue::Bool(true)
        );
    }

    #[test]
    fn timestamps_parse_rfc3339() {
        let value = json!("2024-01-01T00:00:00Z");
        let converted = SqlValue::from_wire(Some(&value), ColumnType::TimestampTz);
        assert!(matches!(converted, SqlValue::Timestamp(_)));

        let bad = json!("yesterday");
        assert!(SqlValue::from_wire(Some(&bad), ColumnType::TimestampTz).is_null());
    }

    #[test]
    fn string_arrays_convert() {
        let value = json!(["a", "b"]);
        assert_eq!(
            SqlValue::from_wire(Some(&value), ColumnType::TextArray),
            SqlValue::TextArray(vec!["a".to_owned(), "b".to_owned()])
        );

        let mixed = json!(["a", 1]);
        assert!(SqlValue::from_wire(Some(&mixed), ColumnType::TextArray).is_null());
    }

    #[test]
    fn structured_values_become_jsonb() {
        let value = json!({"samples": [1, 2, 3]});
        assert_eq!(
            SqlValue::from_wire(Some(&value), ColumnType::Jsonb),
            SqlValue::Json(value)
        );
    }

    #[test]
    fn structured_values_serialize_for_text_columns() {
        let value = json!({"a": 1});
        assert_eq!(
            SqlValue::from_wire(Some(&value), ColumnType::Text),
            SqlValue::Text("{\"a\":1}".to_owned())
        );
    }

    #[test]
    fn identifier_quoting() {
        assert_eq!(quote_ident("body_fat"), "\"body_fat\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn literal_quoting_doubles_single_quotes() {
        assert_eq!(quote_literal("pw1"), "'pw1'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
        assert_eq!(quote_literal("'; DROP TABLE x; --"), "'''; DROP TABLE x; --'");
    }
}
