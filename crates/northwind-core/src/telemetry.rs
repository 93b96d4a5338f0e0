//! Tracing subscriber bootstrap.
//!
//! Installs an `EnvFilter` plus a pretty or JSON `fmt` layer. `RUST_LOG`
//! takes precedence over the configured filter.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::NorthwindResult;
use serde::{Deserialize, Serialize};

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Default filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json_output: bool,
}

fn default_service_name() -> String {
    "northwind".to_string()
}

fn default_filter() -> String {
    "info,northwind=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            filter: default_filter(),
            json_output: false,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> NorthwindResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| crate::NorthwindError::Configuration(format!("Invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    installed.map_err(|e| crate::NorthwindError::internal(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::info!(
        service_name = %config.service_name,
        json_output = config.json_output,
        "Tracing initialized"
    );
    Ok(())
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> NorthwindResult<()> {
    Ok(())
}

/// Runs `f` under a temporary subscriber filtered by `RUST_LOG` alone.
///
/// Used while configuration is still loading, before `init_tracing` can run.
#[cfg(feature = "telemetry")]
pub fn with_bootstrap_tracing<R>(f: impl FnOnce() -> R) -> R {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));
    tracing::subscriber::with_default(subscriber, f)
}

#[cfg(not(feature = "telemetry"))]
pub fn with_bootstrap_tracing<R>(f: impl FnOnce() -> R) -> R {
    f()
}
