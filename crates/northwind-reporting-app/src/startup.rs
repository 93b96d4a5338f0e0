//! Startup logging.

use northwind_config::AppConfig;
use tracing::info;

/// Logs where reports will come from.
pub fn log_startup_info(config: &AppConfig) {
    info!("Environment: {}", config.app.environment);
    info!("Report storage: {}", config.reporting.storage);
    match config.reporting.storage {
        northwind_config::ReportStorage::OData => {
            info!("OData feed: {}", config.reporting.odata_url);
        }
        northwind_config::ReportStorage::Sql => {
            info!(
                max_connections = config.database.max_connections,
                "Reports run as stored procedures"
            );
        }
    }
}
