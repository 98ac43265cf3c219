//! Result sets as ordered row-mappings
//!
//! Every procedure result decodes into [`Rows`]: one JSON object per row,
//! columns in result-set order.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use uuid::Uuid;

use crate::error::DbError;

/// One result row: column name -> scalar value
pub type Row = Map<String, Value>;

/// Decoded result set of one procedure call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Rows(Vec<Row>);

impl Rows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self(rows)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.0.iter()
    }

    /// Status text of procedures that answer with a single message
    /// ("record added", "record already exists", ...): the first value of
    /// the first row, when it is a string.
    pub fn status_message(&self) -> Option<&str> {
        self.0.first()?.values().next()?.as_str()
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self(rows)
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a row from `(column, value)` pairs, keeping their order.
pub fn row<I, K>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Decode a Postgres row into a row-mapping by column type name.
///
/// NUMERIC keeps its exact digits as a string. Types without a dedicated
/// arm (enums, domains, composites, ranges) come back as their wire text,
/// or `\x`-prefixed hex when that is not printable.
pub fn decode_row(row: &PgRow) -> Result<Row, DbError> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let type_name = column.type_info().name();

        let value = match type_name {
            "BOOL" => to_value(row.try_get::<Option<bool>, _>(idx)?),
            "INT2" => to_value(row.try_get::<Option<i16>, _>(idx)?),
            "INT4" => to_value(row.try_get::<Option<i32>, _>(idx)?),
            "INT8" => to_value(row.try_get::<Option<i64>, _>(idx)?),
            "FLOAT4" => to_value(row.try_get::<Option<f32>, _>(idx)?),
            "FLOAT8" => to_value(row.try_get::<Option<f64>, _>(idx)?),
            "NUMERIC" => to_value(
                row.try_get::<Option<Decimal>, _>(idx)?
                    .map(|d| d.to_string()),
            ),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
                to_value(row.try_get::<Option<String>, _>(idx)?)
            }
            "\"CHAR\"" => to_value(
                row.try_get::<Option<i8>, _>(idx)?
                    .map(|c| char::from(c as u8).to_string()),
            ),
            "UUID" => to_value(
                row.try_get::<Option<Uuid>, _>(idx)?
                    .map(|u| u.to_string()),
            ),
            "BYTEA" => to_value(row.try_get::<Option<Vec<u8>>, _>(idx)?.map(|b| hex(&b))),
            "DATE" => to_value(
                row.try_get::<Option<NaiveDate>, _>(idx)?
                    .map(|d| d.to_string()),
            ),
            "TIME" => to_value(
                row.try_get::<Option<NaiveTime>, _>(idx)?
                    .map(|t| t.to_string()),
            ),
            "TIMESTAMP" => to_value(
                row.try_get::<Option<NaiveDateTime>, _>(idx)?
                    .map(|t| t.to_string()),
            ),
            "TIMESTAMPTZ" => to_value(
                row.try_get::<Option<DateTime<Utc>>, _>(idx)?
                    .map(|t| t.to_rfc3339()),
            ),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(idx)?.unwrap_or(Value::Null),
            "INT2[]" => to_value(row.try_get::<Option<Vec<Option<i16>>>, _>(idx)?),
            "INT4[]" => to_value(row.try_get::<Option<Vec<Option<i32>>>, _>(idx)?),
            "INT8[]" => to_value(row.try_get::<Option<Vec<Option<i64>>>, _>(idx)?),
            "TEXT[]" | "VARCHAR[]" => {
                to_value(row.try_get::<Option<Vec<Option<String>>>, _>(idx)?)
            }
            "VOID" => Value::Null,
            other => {
                let raw = row.try_get_raw(idx)?;
                if raw.is_null() {
                    Value::Null
                } else {
                    let bytes = raw.as_bytes().map_err(|_| DbError::UnsupportedColumn {
                        column: column.name().to_owned(),
                        type_name: other.to_owned(),
                    })?;
                    tracing::debug!(
                        column = column.name(),
                        type_name = other,
                        "decoding column as raw text"
                    );
                    raw_value(bytes)
                }
            }
        };

        out.insert(column.name().to_owned(), value);
    }
    Ok(out)
}

/// Printable UTF-8 as a string, anything else as `\x` hex.
fn raw_value(bytes: &[u8]) -> Value {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.chars().any(|c| c.is_control() && !c.is_whitespace()) => {
            Value::String(text.to_owned())
        }
        _ => Value::String(hex(bytes)),
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn to_value<T: Into<Value>>(v: Option<T>) -> Value {
    v.map_or(Value::Null, Into::into)
}
