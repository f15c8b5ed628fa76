//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before anything reaches a repository.

use super::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Client and event names/titles
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, CPF, invoice reference, color codes, tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} não pode ficar vazio")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} é longo demais ({} caracteres, máximo {max_len})",
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
            "{field} é longo demais ({} caracteres, máximo {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an optional wire date string (YYYY-MM-DD) in place.
pub fn validate_optional_date(value: &Option<String>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value {
        super::time::parse_date(v)
            .map_err(|_| AppError::validation(format!("{field} inválida: {v} (use YYYY-MM-DD)")))?;
    }
    Ok(())
}
