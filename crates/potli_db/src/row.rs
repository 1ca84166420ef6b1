//! Column codecs shared by the SQL repositories.
//!
//! The Any driver only moves primitives, so timestamps travel as RFC 3339
//! text, booleans as integers and JSON objects as text.

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use potli_common::models::Metadata;
use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};

pub(crate) fn string(row: &AnyRow, col: &str) -> Result<String, DbError> {
    row.try_get::<String, _>(col)
        .map_err(|e| DbError::DecodeError(format!("{col}: {e}")))
}

/// The Any driver refuses to decode NULL into `Option<T>`, so NULL is
/// checked on the raw value first.
pub(crate) fn opt_string(row: &AnyRow, col: &str) -> Result<Option<String>, DbError> {
    let raw = row
        .try_get_raw(col)
        .map_err(|e| DbError::DecodeError(format!("{col}: {e}")))?;
    if raw.is_null() {
        return Ok(None);
    }
    string(row, col).map(Some)
}

pub(crate) fn int(row: &AnyRow, col: &str) -> Result<i64, DbError> {
    row.try_get::<i64, _>(col)
        .map_err(|e| DbError::DecodeError(format!("{col}: {e}")))
}

pub(crate) fn flag(row: &AnyRow, col: &str) -> Result<bool, DbError> {
    int(row, col).map(|v| v != 0)
}

pub(crate) fn timestamp(row: &AnyRow, col: &str) -> Result<DateTime<Utc>, DbError> {
    parse_timestamp(&string(row, col)?, col)
}

pub(crate) fn opt_timestamp(row: &AnyRow, col: &str) -> Result<Option<DateTime<Utc>>, DbError> {
    opt_string(row, col)?
        .map(|raw| parse_timestamp(&raw, col))
        .transpose()
}

pub(crate) fn json_map(row: &AnyRow, col: &str) -> Result<Metadata, DbError> {
    match opt_string(row, col)? {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map_err(|e| DbError::DecodeError(format!("{col}: {e}"))),
        _ => Ok(Metadata::new()),
    }
}

fn parse_timestamp(raw: &str, col: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("{col}: {e}")))
}

/// Millisecond precision, `Z` suffix; sorts lexicographically.
pub(crate) fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn bool_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn json_text(value: &Metadata) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|e| DbError::QueryError(e.to_string()))
}

/// Maps a failed statement to `Duplicate` when it hit a unique index.
pub(crate) fn query_error(context: &str, err: sqlx::Error) -> DbError {
    tracing::error!("{}: {}", context, err);
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::Duplicate(db_err.message().to_string());
        }
    }
    DbError::QueryError(err.to_string())
}
