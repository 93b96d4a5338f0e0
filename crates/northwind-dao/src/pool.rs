//! Database connection pool management.
//!
//! The pool is the lease abstraction behind every DAO call: each command
//! acquires one connection and returns it when done. `max_connections`
//! bounds how many DAO calls can run at once.

use async_trait::async_trait;
use northwind_config::DatabaseConfig;
use northwind_core::{Interface, NorthwindError, NorthwindResult};
use shaku::Component;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use tracing::{info, warn};

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns a reference to the underlying MySQL pool.
    fn inner(&self) -> &MySqlPool;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> NorthwindResult<()>;

    /// Creates the Northwind schema and stored procedures.
    async fn run_migrations(&self) -> NorthwindResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> NorthwindResult<Self> {
        if config.url.is_empty() {
            return Err(NorthwindError::missing_argument("database.url"));
        }

        info!("Connecting to MySQL database...");

        let mut options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| NorthwindError::Configuration(format!("Invalid database URL: {e}")))?;
        if !config.log_queries {
            options = options.disable_statement_logging();
        }

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                NorthwindError::Database(format!("Failed to connect: {e}"))
            })?;

        info!(
            max_connections = config.max_connections,
            "MySQL connection pool established"
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> NorthwindResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| NorthwindError::Database(format!("Health check failed: {e}")))?;
        Ok(())
    }

    async fn run_migrations(&self) -> NorthwindResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| NorthwindError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_url_is_missing_argument() {
        let config = DatabaseConfig {
            url: String::new(),
            ..DatabaseConfig::default()
        };
        let err = DatabasePool::new(&config).await.unwrap_err();
        assert!(matches!(err, NorthwindError::MissingArgument(ref a) if a == "database.url"));
    }

    #[tokio::test]
    async fn test_malformed_url_is_configuration_error() {
        let config = DatabaseConfig {
            url: "mysql://[::1".to_string(),
            ..DatabaseConfig::default()
        };
        let err = DatabasePool::new(&config).await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
