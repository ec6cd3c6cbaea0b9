// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod expr;
pub mod logging;
pub mod registry;
pub mod rule;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;

pub use crate::engine::Engine;
pub use crate::errors::EngineError;
pub use crate::expr::{Expression, Stage};
pub use crate::registry::Registry;
pub use crate::rule::{AsyncAction, Done, RuleBody, RuleDefinition};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - rule-file loading
/// - engine construction and rule registration
/// - running the requested expression
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let engine = Engine::new();
    register_config_rules(&engine, &cfg);

    engine.run(&args.expression).await?;
    Ok(())
}

/// Install every rule from the file into the engine.
///
/// A section with both `cmd` and `deps` registers two bodies under the same
/// name: the command first, then the reference (bodies accumulate and run in
/// registration order).
fn register_config_rules(engine: &Engine, cfg: &ConfigFile) {
    for (name, rule) in cfg.rule.iter() {
        if let Some(cmd) = rule.cmd.as_deref() {
            engine.rule(name, exec::shell_command(name, cmd));
        }
        if let Some(deps) = rule.deps.as_deref() {
            engine.rule(name, RuleBody::reference(deps));
        }
    }
}

/// Simple dry-run output: print rules and their bodies.
fn print_dry_run(cfg: &ConfigFile) {
    println!("cascade dry-run");
    println!();

    println!("rules ({}):", cfg.rule.len());
    for (name, rule) in cfg.rule.iter() {
        println!("  - {name}");
        if let Some(ref cmd) = rule.cmd {
            println!("      cmd: {cmd}");
        }
        if let Some(ref deps) = rule.deps {
            println!("      deps: {deps}");
        }
    }

    debug!("dry-run complete (no execution)");
}
