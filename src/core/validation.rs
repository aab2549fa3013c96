//! Input validation for envcopy operations.
//!
//! Variable and secret names must be valid identifiers; variable values
//! must be non-empty.

use crate::error::ValidationError;

/// Validate a variable or secret name.
///
/// Names must match `^[A-Za-z_][A-Za-z0-9_]*$`:
/// - Only ASCII letters, digits, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` describing the first offending character.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let Some(first) = name.chars().next() else {
        return Err(ValidationError::EmptyName);
    };

    if first.is_ascii_digit() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "cannot start with a digit".to_string(),
        });
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidName {
                name: name.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only A-Z, a-z, 0-9, and underscore are allowed",
                    ch,
                    i + 1
                ),
            });
        }
    }

    Ok(())
}

/// Validate a variable value.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty.
pub fn validate_value(name: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(name.to_string()));
    }
    Ok(())
}
