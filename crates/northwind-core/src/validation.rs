//! Argument validation shared by every DAO.
//!
//! All checks here run synchronously, before a DAO touches its store.

use crate::{NorthwindError, NorthwindResult};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns an invalid argument error on failure.
    fn validate_fields(&self, argument: &str) -> NorthwindResult<()> {
        self.validate()
            .map_err(|e| validation_errors_to_northwind_error(argument, &e))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to an invalid argument error.
#[must_use]
pub fn validation_errors_to_northwind_error(
    argument: &str,
    errors: &ValidationErrors,
) -> NorthwindError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {detail}")
            })
        })
        .collect();
    messages.sort();

    NorthwindError::invalid_argument(argument, messages.join("; "))
}

/// Rejects identifiers that cannot address a stored row.
pub fn require_positive_id(argument: &str, id: i32) -> NorthwindResult<()> {
    if id <= 0 {
        return Err(NorthwindError::invalid_argument(
            argument,
            "Must be greater than zero.",
        ));
    }
    Ok(())
}

/// Rejects empty collections.
pub fn require_non_empty<T>(argument: &str, items: &[T]) -> NorthwindResult<()> {
    if items.is_empty() {
        return Err(NorthwindError::invalid_argument(argument, "Collection is empty."));
    }
    Ok(())
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}
