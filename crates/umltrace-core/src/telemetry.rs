//! Logging initialisation

use crate::config::LoggingConfig;
use crate::error::{TraceError, TraceResult};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`. Returns `Ok(false)`
/// when a global subscriber is already installed.
///
/// # Errors
/// Returns error if the configured filter directives do not parse.
pub fn init_tracing(config: &LoggingConfig) -> TraceResult<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| TraceError::Telemetry(format!("invalid filter '{}': {e}", config.filter)))?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(json = config.json, "tracing initialised");
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "tracing already initialised");
            Ok(false)
        }
    }
}
