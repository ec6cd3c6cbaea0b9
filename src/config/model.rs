// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML rule file.
///
/// ```toml
/// [rule."module1.load"]
/// cmd = "curl -sO https://example.com/module1.js"
///
/// [rule.module1]
/// deps = "module1.load > module1.start"
///
/// [rule.everything]
/// cmd = "echo setup"
/// deps = "module1 module2 > report"
/// ```
///
/// A rule section may carry `cmd`, `deps`, or both. Both means two bodies
/// registered under the same name (the command first, then the reference),
/// matching the engine's accumulation semantics.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// All rules from `[rule.<name>]`.
    ///
    /// Keys are the *rule names* referenced by dependency expressions.
    #[serde(default)]
    pub rule: BTreeMap<String, RuleConfig>,
}

/// `[rule.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleConfig {
    /// Shell command to run when the rule fires. Registered as a deferred
    /// body: the rule completes when the process exits, and a non-zero exit
    /// fails the invocation.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Dependency expression naming other rules, e.g. `"a b > c"`.
    /// Registered as a reference body.
    #[serde(default)]
    pub deps: Option<String>,
}
