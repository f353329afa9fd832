//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here at the handler boundary.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: table codes, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, cancellation reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, area codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty (after trimming) and within
/// the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a required integer is present and positive.
pub fn validate_positive(value: Option<i32>, field: &str) -> Result<i32, AppError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(v) => Err(AppError::validation(format!(
            "{field} must be a positive integer, got {v}"
        ))),
        None => Err(AppError::validation(format!("{field} is required"))),
    }
}
