//! Time helpers
//!
//! All datetime parsing happens at the API handler layer; repositories only
//! receive `i64` Unix millis. The service runs on UTC.

use chrono::{DateTime, NaiveDate};

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Start of day (00:00:00 UTC) as Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
        .timestamp_millis()
}

/// Parse an RFC 3339 datetime string into Unix millis
pub fn parse_rfc3339_millis(value: &str, field: &str) -> AppResult<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| {
            AppError::validation(format!("Invalid datetime for {}: {}", field, value))
        })
}

/// Convert a duration in hours to millis (used for booking windows)
pub fn hours_to_millis(hours: f64) -> i64 {
    (hours * 3_600_000.0) as i64
}
