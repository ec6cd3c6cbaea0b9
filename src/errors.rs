// src/errors.rs

//! Error types for the rule engine.
//!
//! The engine deliberately has a small failure surface: unknown rule names
//! and malformed expressions are *not* errors (they resolve to no-op /
//! trivially-complete work), so the only ways an invocation can fail are an
//! action failing or a deferred action losing its completion signal.

use thiserror::Error;

/// Failure of one engine invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An action registered under `rule` returned or signalled an error.
    ///
    /// The invocation's remaining stages do not run; sibling rules of the
    /// same stage that were already in flight are allowed to finish first.
    #[error("rule '{rule}' failed: {source}")]
    ActionFailed {
        rule: String,
        #[source]
        source: anyhow::Error,
    },

    /// A rule this branch waited on was triggered by another branch of the
    /// same invocation and failed there.
    ///
    /// The detailed cause travels up the branch that triggered the rule;
    /// this variant marks the branches that were only waiting on it.
    #[error("rule '{rule}' failed in another branch of this invocation")]
    DependencyFailed { rule: String },

    /// A deferred action dropped its [`Done`](crate::rule::Done) signal
    /// without completing, so the rule can never finish.
    ///
    /// A deferred action that merely *holds* its signal forever is not
    /// detected; that invocation stalls, as the contract allows.
    #[error("rule '{rule}' dropped its completion signal without completing")]
    CompletionDropped { rule: String },
}

impl EngineError {
    /// The rule the failure is attributed to.
    pub fn rule(&self) -> &str {
        match self {
            EngineError::ActionFailed { rule, .. } => rule,
            EngineError::DependencyFailed { rule } => rule,
            EngineError::CompletionDropped { rule } => rule,
        }
    }
}
