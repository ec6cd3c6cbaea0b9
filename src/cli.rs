// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, ValueEnum};

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The `tracing` filter directive string for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Command-line arguments for the `cascade` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cascade",
    about = "Run a dependency expression over named rules from a TOML rule file"
)]
pub struct CliArgs {
    /// Dependency expression to run, e.g. "fmt lint > build > test".
    ///
    /// `>` separates sequential stages; whitespace separates rules that run
    /// concurrently within a stage.
    pub expression: String,

    /// Path to the TOML rule file.
    #[arg(short, long, default_value = "Cascade.toml")]
    pub config: String,

    /// Print the loaded rules and exit without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Log level. Falls back to the `CASCADE_LOG` env var, then "info".
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
