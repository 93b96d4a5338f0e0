//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use northwind_core::NorthwindError;
use std::path::Path;
use tracing::{debug, info};

/// Loads configuration once from a directory plus the environment.
#[derive(Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: String,
}

impl ConfigLoader {
    /// Loads and validates configuration.
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml`, never committed
    /// 4. Environment variables with the `NORTHWIND_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, NorthwindError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;
        Ok(Self { config, config_dir })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, NorthwindError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("NORTHWIND_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{config_dir}/{name}.toml");
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("NORTHWIND")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_northwind_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_northwind_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| NorthwindError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("config_dir", &self.config_dir)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::needless_pass_by_value)]
fn config_error_to_northwind_error(err: ConfigError) -> NorthwindError {
    NorthwindError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportStorage;
    use std::fs;

    fn write_default(dir: &tempfile::TempDir, contents: &str) {
        fs::write(dir.path().join("default.toml"), contents).unwrap();
    }

    #[test]
    fn test_loads_sections_from_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write_default(
            &dir,
            r#"
[database]
url = "mysql://nw:nw@db:3306/northwind"
min_connections = 2
max_connections = 8
connect_timeout_secs = 5
idle_timeout_secs = 60
log_queries = true

[reporting]
storage = "sql"
odata_url = "https://example.org/Northwind.svc"
request_timeout_secs = 10
"#,
        );

        let config = ConfigLoader::new(dir.path().to_string_lossy())
            .unwrap()
            .into_config();

        assert_eq!(config.database.url, "mysql://nw:nw@db:3306/northwind");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.reporting.storage, ReportStorage::Sql);
        assert_eq!(config.currency.base_currency, "USD");
    }

    #[test]
    fn test_missing_directory_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent").to_string_lossy()).unwrap();
        let config = loader.config();
        assert_eq!(config.reporting.storage, ReportStorage::OData);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_default(
            &dir,
            r#"
[database]
url = ""
min_connections = 1
max_connections = 10
connect_timeout_secs = 30
idle_timeout_secs = 600
log_queries = false
"#,
        );

        let err = ConfigLoader::new(dir.path().to_string_lossy()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("database"));
    }

    #[test]
    fn test_local_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        write_default(
            &dir,
            r#"
[currency]
country_service_url = "https://restcountries.com/v3.1"
exchange_service_url = "http://api.currencylayer.com"
base_currency = "EUR"
"#,
        );
        fs::write(
            dir.path().join("local.toml"),
            "[currency]\nbase_currency = \"GBP\"\n",
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        assert_eq!(loader.config().currency.base_currency, "GBP");
    }
}
