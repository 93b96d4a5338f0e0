//! Configuration validation module.
//!
//! Collects every problem in one pass so a bad deployment fails fast
//! with the full list instead of at first use.

use crate::{AppConfig, ReportStorage};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Currency code must be three ASCII letters.
    InvalidCurrencyCode { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({min}) cannot be greater than max ({max})"
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {value} exceeds maximum allowed ({maximum})")
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {url_type} URL: {message}")
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "Timeout '{name}' must be positive")
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{value}' (valid: trace, debug, info, warn, error)"
                )
            }
            Self::InvalidCurrencyCode { value } => {
                write!(f, "Invalid currency code: '{value}' (expected e.g. USD)")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_reporting(&config.reporting, &mut errors);
        Self::validate_currency(&config.currency, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("mysql://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
            });
        }
    }

    fn validate_reporting(config: &crate::ReportingConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.storage == ReportStorage::OData {
            check_http_url("reporting.odata_url", &config.odata_url, errors);
        }
        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "reporting.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_currency(config: &crate::CurrencyConfig, errors: &mut Vec<ConfigValidationError>) {
        check_http_url("currency.country_service_url", &config.country_service_url, errors);
        check_http_url("currency.exchange_service_url", &config.exchange_service_url, errors);

        let code = &config.base_currency;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push(ConfigValidationError::InvalidCurrencyCode { value: code.clone() });
        }
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

fn check_http_url(url_type: &str, value: &str, errors: &mut Vec<ConfigValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
            url_type: url_type.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ConfigValidationError::InvalidUrl {
            url_type: url_type.to_string(),
            message: format!("Invalid URL format: {value} ({e})"),
        }),
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_non_mysql_database_url() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://localhost/northwind".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database"
        )));
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = AppConfig::default();
        config.database.min_connections = 100;
        config.database.max_connections = 10;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidPoolSize { .. })));
    }

    #[test]
    fn test_odata_url_only_checked_for_odata_storage() {
        let mut config = AppConfig::default();
        config.reporting.odata_url = "not a url".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        config.reporting.storage = ReportStorage::Sql;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_currency_checks() {
        let mut config = AppConfig::default();
        config.currency.base_currency = "US".to_string();
        config.currency.exchange_service_url = "ftp://api.currencylayer.com".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidCurrencyCode { .. })));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        config.database.connect_timeout_secs = 0;
        config.observability.log_level = "verbose".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);

        let formatted = format_validation_errors(&errors);
        assert!(formatted.starts_with("Configuration validation failed:"));
        assert!(formatted.contains("  3. "));
    }
}
