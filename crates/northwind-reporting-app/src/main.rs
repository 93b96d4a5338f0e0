//! # Northwind Reports
//!
//! Prints one product report per invocation. The backend (OData feed or
//! stored procedures) comes from `reporting.storage` unless `--storage`
//! overrides it.

use clap::Parser;
use northwind_config::ConfigLoader;
use northwind_core::telemetry::{init_tracing, with_bootstrap_tracing};
use northwind_core::NorthwindResult;
use northwind_reporting_app::cli::Cli;
use northwind_reporting_app::{app, startup};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(code = e.error_code(), "Report failed: {}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> NorthwindResult<()> {
    let mut config =
        with_bootstrap_tracing(|| ConfigLoader::new(cli.config_dir.clone()))?.into_config();
    if let Some(storage) = cli.storage {
        config.reporting.storage = storage;
    }

    init_tracing(&config.observability.telemetry(env!("CARGO_PKG_NAME")))?;
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    startup::log_startup_info(&config);

    app::execute(&config, cli.command).await
}
