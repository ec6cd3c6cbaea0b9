// src/config/validate.rs

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::config::model::ConfigFile;
use crate::expr::Expression;

/// Run basic semantic validation against a loaded rule file.
///
/// This checks:
/// - there is at least one rule
/// - every rule has at least one body (`cmd` and/or `deps`)
///
/// It warns (but does not fail) when a `deps` expression references a name
/// no `[rule.<name>]` section defines: unknown names are no-op successes by
/// design, so such a reference is legal, but in a static config file it is
/// far more likely to be a typo.
///
/// It does **not** reject cyclic references. A rule that references itself
/// terminates at run time through the per-invocation dedupe invariant.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_rules(cfg)?;
    ensure_rules_have_bodies(cfg)?;
    warn_on_unknown_references(cfg);
    Ok(())
}

fn ensure_has_rules(cfg: &ConfigFile) -> Result<()> {
    if cfg.rule.is_empty() {
        return Err(anyhow!(
            "rule file must contain at least one [rule.<name>] section"
        ));
    }
    Ok(())
}

fn ensure_rules_have_bodies(cfg: &ConfigFile) -> Result<()> {
    for (name, rule) in cfg.rule.iter() {
        if rule.cmd.is_none() && rule.deps.is_none() {
            return Err(anyhow!(
                "rule '{}' has neither `cmd` nor `deps`; it would never do anything",
                name
            ));
        }
    }
    Ok(())
}

fn warn_on_unknown_references(cfg: &ConfigFile) {
    for (name, rule) in cfg.rule.iter() {
        let Some(deps) = rule.deps.as_deref() else {
            continue;
        };

        for stage in Expression::parse(deps).stages() {
            for referenced in stage.names() {
                if !cfg.rule.contains_key(referenced) {
                    warn!(
                        rule = %name,
                        referenced = %referenced,
                        "deps references a name not defined in this file; it will complete as a no-op"
                    );
                }
            }
        }
    }
}
