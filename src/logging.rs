// src/logging.rs

//! Logging setup for `cascade` using `tracing` + `tracing-subscriber`.
//!
//! The active filter is resolved in this order:
//! 1. `--log-level` CLI flag, applied as a global level
//! 2. `CASCADE_LOG` environment variable, which accepts full `EnvFilter`
//!    directive strings (e.g. `debug` or `cascade::engine=trace,warn`)
//! 3. default to `info`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber.
///
/// Call once at startup; `init` panics on a second call.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => EnvFilter::try_from_env("CASCADE_LOG")
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.as_directive())),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}
