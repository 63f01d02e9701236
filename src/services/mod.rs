//! Backend operations
//!
//! One function per operation exposed over HTTP. Each takes the database
//! (and the completion client where AI is involved), checks its input and
//! returns an [`ApiResult`](crate::error::ApiResult).
//!
//! A service function checks out at most one pooled connection and never
//! holds it across an `.await`.

pub mod body_metrics;
pub mod dashboard;
pub mod exercises;
pub mod food_items;
pub mod meals;
pub mod progress;
pub mod status;
pub mod users;
pub mod workouts;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

use crate::error::{ApiError, ApiResult};
use crate::models::{User, TIMESTAMP_FORMAT};

/// Load a user or fail with 404
pub(crate) fn require_user(conn: &Connection, user_id: i64) -> ApiResult<User> {
    User::get_by_id(conn, user_id)?.ok_or_else(|| ApiError::not_found("User"))
}

/// Normalise an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight
/// UTC) to the stored timestamp format.
pub(crate) fn normalize_timestamp(value: &str) -> ApiResult<String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(format!("{}T00:00:00Z", date.format("%Y-%m-%d")));
    }
    Err(ApiError::BadRequest(format!("Invalid date '{}'", value)))
}

/// Calendar date (`YYYY-MM-DD`) of a date or timestamp string
pub(crate) fn calendar_date(value: &str) -> ApiResult<String> {
    let timestamp = normalize_timestamp(value)?;
    Ok(timestamp[..10].to_owned())
}

/// Reject empty or whitespace-only text fields
pub(crate) fn require_text(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}
