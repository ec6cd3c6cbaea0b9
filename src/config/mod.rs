// src/config/mod.rs

//! Rule-file loading and validation for the CLI layer.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a rule file from disk (`loader.rs`).
//! - Validate basic invariants like non-empty rules (`validate.rs`).
//!
//! Library users never need this; it exists so the `cascade` binary can
//! register rules from a file instead of code.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, RuleConfig};
pub use validate::validate_config;
