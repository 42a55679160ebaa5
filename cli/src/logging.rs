//! # Logging
//!
//! Installs the global `tracing` subscriber. Output goes to stderr so that
//! `render` and `operation` can pipe their result from stdout.

use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Maps `-v` occurrences to a default filter directive.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter; `RUST_LOG` takes precedence over the verbosity flag.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)))
}

/// Initialize the global logging system.
pub fn init_logging(verbosity: u8) -> CliResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::General(format!("Failed to initialize logging: {}", e)))?;
    tracing::debug!(verbosity, "Logging system initialized");
    Ok(())
}
