//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::models::ProductKind;
use validator::ValidationErrors;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Product, ingredient and person names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, postal code, card number
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Street and city
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Numeric limits ──────────────────────────────────────────────────

/// Product and supplement prices, in cents
pub const MAX_PRICE: i64 = 1_000_000;

/// Units of stock held for one product
pub const MAX_STOCK: i64 = 1_000_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
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

/// Five-digit postal code
pub fn is_valid_postal_code(value: &str) -> bool {
    let value = value.trim();
    value.len() == 5 && value.chars().all(|c| c.is_ascii_digit())
}

/// Card number digits with spaces and dashes stripped; `None` on any other character
pub fn card_digits(card_number: &str) -> Option<Vec<u32>> {
    card_number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect()
}

/// Luhn checksum over 12 to 19 digits
pub fn luhn_valid(digits: &[u32]) -> bool {
    if !(12..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Parse a `kind` query or path segment
pub fn parse_kind(raw: &str) -> Result<ProductKind, AppError> {
    raw.parse::<ProductKind>()
        .map_err(|e| AppError::validation(e).with_detail("kind", raw))
}

/// Convert `validator` derive errors into a client-facing error.
///
/// A failing `password` field maps to `PasswordPolicy`; anything else is a
/// plain validation failure. Offending field names go into `details.fields`.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<String> = field_errors.keys().map(|k| k.to_string()).collect();
    fields.sort();

    let err = if field_errors.contains_key("password") {
        AppError::with_message(
            ErrorCode::PasswordPolicy,
            format!(
                "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
            ),
        )
    } else {
        AppError::validation(format!("Invalid fields: {}", fields.join(", ")))
    };
    err.with_detail("fields", fields)
}
