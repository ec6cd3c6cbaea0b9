// src/registry.rs

//! The rule registry: a process-wide mapping from rule name to definition.
//!
//! The registry is shared and mutable at any time, including from inside a
//! rule's own action while an invocation is in flight. The engine reads it
//! at expansion time rather than snapshotting it up front, which is what
//! makes on-the-fly definitions visible to the invocation that created them.
//! Access is serialised with a mutex because the tokio host is
//! multi-threaded.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::rule::{RuleBody, RuleDefinition};

/// Name-keyed store of rule definitions.
///
/// Setting a name that already exists *appends* to its body sequence rather
/// than overwriting it; `remove` and `clear` drop whole sequences.
#[derive(Debug, Default)]
pub struct Registry {
    rules: Mutex<HashMap<String, RuleDefinition>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body under `name`, appending if the name already has one.
    pub fn set(&self, name: &str, body: RuleBody) {
        let mut rules = self.rules.lock().unwrap();
        let def = rules.entry(name.to_string()).or_default();
        def.push(body);
        debug!(rule = %name, bodies = def.len(), "rule registered");
    }

    /// Register every `(name, body)` pair, in iteration order.
    ///
    /// Entries are independent: each one appends like [`set`](Self::set),
    /// and there is no atomicity across the batch.
    pub fn set_many<I, N>(&self, entries: I)
    where
        I: IntoIterator<Item = (N, RuleBody)>,
        N: AsRef<str>,
    {
        for (name, body) in entries {
            self.set(name.as_ref(), body);
        }
    }

    /// The full definition for `name`, or `None` if never registered.
    /// Looking up an unknown name is not an error.
    pub fn get(&self, name: &str) -> Option<RuleDefinition> {
        self.rules.lock().unwrap().get(name).cloned()
    }

    /// Body at `index` under `name`.
    ///
    /// The invoker calls this once per body rather than snapshotting the
    /// definition, so a body appended to `name` while `name` is executing
    /// still runs in the same pass.
    pub fn body_at(&self, name: &str, index: usize) -> Option<RuleBody> {
        self.rules
            .lock()
            .unwrap()
            .get(name)
            .and_then(|def| def.body_at(index))
    }

    /// Remove the whole definition for `name`. Removing an unknown name is
    /// a no-op.
    pub fn remove(&self, name: &str) {
        if self.rules.lock().unwrap().remove(name).is_some() {
            debug!(rule = %name, "rule removed");
        }
    }

    /// Remove every registered rule.
    pub fn clear(&self) {
        let mut rules = self.rules.lock().unwrap();
        let count = rules.len();
        rules.clear();
        debug!(count, "registry cleared");
    }

    /// Registered rule names, unordered.
    pub fn names(&self) -> Vec<String> {
        self.rules.lock().unwrap().keys().cloned().collect()
    }

    /// Number of registered rule names.
    pub fn len(&self) -> usize {
        self.rules.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.lock().unwrap().is_empty()
    }
}
