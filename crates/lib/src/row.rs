//! Small helpers for moving values between Rust types and `turso` rows.

use crate::errors::IchidanError;
use chrono::{DateTime, NaiveDateTime, Utc};
use turso::{Row, Value};

/// SQLite's `CURRENT_TIMESTAMP` format.
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, IchidanError> {
    NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT)
        .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        .map_err(|e| {
            IchidanError::StorageOperationFailed(format!("Failed to parse date '{raw}': {e}"))
        })
}

pub(crate) fn get_timestamp(row: &Row, idx: usize) -> Result<DateTime<Utc>, IchidanError> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
}

pub(crate) fn get_opt_timestamp(
    row: &Row,
    idx: usize,
) -> Result<Option<DateTime<Utc>>, IchidanError> {
    get_opt_text(row, idx)?
        .map(|raw| parse_timestamp(&raw))
        .transpose()
}

pub(crate) fn get_opt_text(row: &Row, idx: usize) -> Result<Option<String>, IchidanError> {
    match row.get_value(idx)? {
        Value::Text(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(IchidanError::StorageOperationFailed(format!(
            "Expected TEXT or NULL in column {idx}, found {other:?}"
        ))),
    }
}

pub(crate) fn get_opt_i64(row: &Row, idx: usize) -> Result<Option<i64>, IchidanError> {
    match row.get_value(idx)? {
        Value::Integer(i) => Ok(Some(i)),
        Value::Null => Ok(None),
        other => Err(IchidanError::StorageOperationFailed(format!(
            "Expected INTEGER or NULL in column {idx}, found {other:?}"
        ))),
    }
}

pub(crate) fn get_bool(row: &Row, idx: usize) -> Result<bool, IchidanError> {
    let raw: i64 = row.get(idx)?;
    Ok(raw != 0)
}

pub(crate) fn text(value: impl Into<String>) -> Value {
    Value::Text(value.into())
}

pub(crate) fn opt_text(value: Option<String>) -> Value {
    value.map(Value::Text).unwrap_or(Value::Null)
}

pub(crate) fn integer(value: i64) -> Value {
    Value::Integer(value)
}

pub(crate) fn opt_integer(value: Option<i64>) -> Value {
    value.map(Value::Integer).unwrap_or(Value::Null)
}

pub(crate) fn boolean(value: bool) -> Value {
    Value::Integer(i64::from(value))
}

/// Reads the first column of the first row as an integer, e.g. `SELECT COUNT(*)`.
pub(crate) async fn scalar_i64(
    conn: &turso::Connection,
    sql: &str,
    params: Vec<Value>,
) -> Result<i64, IchidanError> {
    let mut rows = conn.query(sql, params).await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}
