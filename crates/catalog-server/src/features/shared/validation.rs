//! Shared validation utilities
//!
//! Provides common validation functions for input data across commands and queries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use catalog_server::features::shared::validation::{validate_name, validate_required_text};
//!
//! validate_name(&command.name_en, 255)?;
//! validate_required_text("phone_number", &command.phone_number, 50)?;
//! ```
//!
//! Lengths are counted in characters, not bytes, so Arabic input gets the
//! same limit as Latin input.

use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,

    #[error("Name must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

/// Errors for a named required text field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

/// Validate a name field
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed max_length characters
pub fn validate_name(name: &str, max_length: usize) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required);
    }

    if name.chars().count() > max_length {
        return Err(NameValidationError::TooLong { max_length });
    }

    Ok(())
}

/// Validate an optional name; `None` is accepted, `Some("")` is not
pub fn validate_optional_name(
    name: Option<&str>,
    max_length: usize,
) -> Result<(), NameValidationError> {
    match name {
        Some(name) => validate_name(name, max_length),
        None => Ok(()),
    }
}

/// Validate a required text field, reporting the field name on failure
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    if value.trim().is_empty() {
        return Err(FieldValidationError::Required { field });
    }

    if value.chars().count() > max_length {
        return Err(FieldValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate a positive database id supplied by a caller
#[inline]
pub fn is_valid_id(id: i32) -> bool {
    id > 0
}
