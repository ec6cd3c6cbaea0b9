// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a rule file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (empty rules, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading rule file at {path:?}"))?;

    let config: ConfigFile =
        toml::from_str(&contents).with_context(|| format!("parsing TOML rules from {path:?}"))?;

    Ok(config)
}

/// Load a rule file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
/// it reads the TOML, checks every rule has at least one body, and warns
/// about names referenced in `deps` but never defined (legal at run time —
/// unknown names complete as no-ops — but usually a typo in a config file).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Helper to resolve a default rule-file path.
///
/// Currently this just returns `Cascade.toml` in the current working
/// directory; having it as a function leaves room for env-var or
/// multi-location lookup later.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Cascade.toml")
}
