//! Unified error types for all layers of the data access stack.

use crate::EntityNotFound;
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the Northwind data access layer.
///
/// Caller errors (`InvalidArgument`, `MissingArgument`) are always raised
/// before any I/O takes place. Store and enrichment failures are propagated
/// unchanged and never retried by this crate family.
#[derive(Error, Debug)]
pub enum NorthwindError {
    // ============ Caller Errors ============
    /// An out-of-contract argument value.
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// A required argument was absent.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// A by-id lookup found no row.
    #[error(transparent)]
    NotFound(#[from] EntityNotFound),

    // ============ Infrastructure Errors ============
    /// The backing store rejected or failed to execute a command.
    #[error("Database error: {0}")]
    Database(String),

    /// A result row could not be mapped onto a transfer object.
    #[error("Row mapping error: {0}")]
    Mapping(String),

    /// A downstream service (OData feed, currency lookups) failed.
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NorthwindError {
    /// Returns the HTTP status code a presentation layer should use.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidArgument { .. } | Self::MissingArgument(_) => 400,
            Self::ExternalService { .. } => 502,
            Self::Database(_)
            | Self::Mapping(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::MissingArgument(_) => "MISSING_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Mapping(_) => "MAPPING_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Creates a missing argument error.
    #[must_use]
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument(argument.into())
    }

    /// Creates a row mapping error.
    #[must_use]
    pub fn mapping<T: Into<String>>(message: T) -> Self {
        Self::Mapping(message.into())
    }

    /// Creates an external service error.
    #[must_use]
    pub fn external(service: impl Into<String>, message: impl ToString) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the caller supplied an out-of-contract value.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::MissingArgument(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for NorthwindError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::ColumnNotFound(column) => {
                Self::Mapping(format!("column '{column}' missing from result set"))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Mapping(format!("column {index} could not be decoded: {source}"))
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for NorthwindError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityKind;

    #[test]
    fn test_error_status_codes() {
        let not_found = NorthwindError::from(EntityNotFound::new(EntityKind::Product, 7));
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(NorthwindError::invalid_argument("id", "bad").status_code(), 400);
        assert_eq!(NorthwindError::missing_argument("names").status_code(), 400);
        assert_eq!(NorthwindError::external("restcountries", "down").status_code(), 502);
        assert_eq!(NorthwindError::Database("gone".to_string()).status_code(), 500);
        assert_eq!(NorthwindError::mapping("column").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(NorthwindError::invalid_argument("id", "bad").error_code(), "INVALID_ARGUMENT");
        assert_eq!(NorthwindError::missing_argument("x").error_code(), "MISSING_ARGUMENT");
        assert_eq!(NorthwindError::Database("x".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(NorthwindError::mapping("x").error_code(), "MAPPING_ERROR");
        assert_eq!(NorthwindError::internal("x").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            NorthwindError::Configuration("x".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = NorthwindError::invalid_argument("id", "Must be greater than zero.");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'id': Must be greater than zero."
        );
        assert!(err.is_invalid_argument());
        assert!(!NorthwindError::Database("x".to_string()).is_invalid_argument());
    }

    #[test]
    fn test_not_found_display_is_transparent() {
        let err = NorthwindError::from(EntityNotFound::new(EntityKind::Employee, 42));
        assert_eq!(err.to_string(), "Employee with id 42 not found");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = NorthwindError::from(json_err);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
