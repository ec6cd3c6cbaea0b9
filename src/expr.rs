// src/expr.rs

//! The dependency expression DSL.
//!
//! An expression is a `>`-separated sequence of stages; each stage is a
//! whitespace-separated set of rule names:
//!
//! ```text
//! "a.load > a.start"     run a.load, then a.start
//! "a b"                  run a and b concurrently
//! "a > b c > d"          a, then b and c together, then d
//! ```
//!
//! Any string parses to *some* expression: empty segments and extra
//! whitespace are tolerated, and an all-whitespace string parses to an
//! expression that is trivially complete.

/// One stage: rule names to trigger concurrently.
///
/// Duplicate names within a stage are collapsed at parse time (triggering is
/// deduplicated per invocation anyway, so duplicates would only be wasted
/// bookkeeping). Order of first appearance is preserved for deterministic
/// iteration, but no ordering is guaranteed between the rules at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    names: Vec<String>,
}

impl Stage {
    /// Rule names in this stage, in first-appearance order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True if the stage references no rules at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A parsed dependency expression: an ordered sequence of [`Stage`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    stages: Vec<Stage>,
}

impl Expression {
    /// Parse an expression string.
    ///
    /// Splits on `>` to get stage segments, then on whitespace runs within
    /// each segment to get rule names. Empty tokens are discarded, so
    /// `" a >  > b  c "` parses the same as `"a > b c"` plus one empty
    /// stage in the middle (empty stages complete immediately at run time).
    /// Parsing never fails.
    pub fn parse(input: &str) -> Self {
        let stages: Vec<Stage> = input
            .split('>')
            .map(|segment| {
                let mut names: Vec<String> = Vec::new();
                for token in segment.split_whitespace() {
                    if !names.iter().any(|n| n == token) {
                        names.push(token.to_string());
                    }
                }
                Stage { names }
            })
            .collect();

        // "" and "   " parse to a single empty stage; normalise the
        // nothing-to-do case to zero stages.
        if stages.iter().all(|s| s.is_empty()) {
            return Self { stages: Vec::new() };
        }

        Self { stages }
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// True if the expression references no rules (trivially complete).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
