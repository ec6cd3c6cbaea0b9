// src/rule.rs

//! Rule bodies and the completion signal handed to deferred actions.
//!
//! A rule name maps to an ordered sequence of bodies (see
//! [`Registry`](crate::registry::Registry)); each body is one of:
//!
//! - [`RuleBody::Immediate`] — a synchronous action, complete on return
//! - [`RuleBody::Deferred`] — an action that completes later via [`Done`]
//! - [`RuleBody::Reference`] — a dependency expression naming other rules

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

/// Synchronous action: complete the instant it returns `Ok`.
pub type ImmediateFn = dyn Fn() -> anyhow::Result<()> + Send + Sync;

/// Deferred action: receives a [`Done`] signal and completes when it fires.
///
/// The returned `Result` covers only the synchronous part (e.g. a failed
/// spawn); once `Ok` is returned the rule is considered in flight until the
/// signal fires.
pub type DeferredFn = dyn Fn(Done) -> anyhow::Result<()> + Send + Sync;

/// External asynchronous collaborator (resource load, fetch, ...).
///
/// `start` must arrange for `done` to fire exactly once when the work
/// finishes. Registered via [`RuleBody::external`], it behaves like any other
/// deferred body, including per-invocation deduplication: two rules
/// referencing the same external-backed name start it once.
pub trait AsyncAction: Send + Sync + 'static {
    fn start(&self, done: Done);
}

/// One-shot completion signal for a deferred action.
///
/// Consumed on use, so completing twice is impossible by construction.
/// Dropping it without completing closes the channel and the engine reports
/// [`EngineError::CompletionDropped`](crate::errors::EngineError) for the
/// rule instead of stalling.
pub struct Done {
    rule: String,
    tx: oneshot::Sender<anyhow::Result<()>>,
}

impl Done {
    pub(crate) fn new(rule: &str) -> (Self, oneshot::Receiver<anyhow::Result<()>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                rule: rule.to_string(),
                tx,
            },
            rx,
        )
    }

    /// The rule this signal belongs to.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Mark the deferred work as successfully finished.
    pub fn complete(self) {
        debug!(rule = %self.rule, "deferred action completed");
        let _ = self.tx.send(Ok(()));
    }

    /// Mark the deferred work as failed; the invocation fails with
    /// `ActionFailed` once in-flight siblings have finished.
    pub fn fail(self, err: impl Into<anyhow::Error>) {
        let err = err.into();
        debug!(rule = %self.rule, error = %err, "deferred action failed");
        let _ = self.tx.send(Err(err));
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done").field("rule", &self.rule).finish()
    }
}

/// One body of a rule; a closed set of shapes resolved by pattern matching
/// at invocation time.
#[derive(Clone)]
pub enum RuleBody {
    /// Synchronous action; complete when it returns.
    Immediate(Arc<ImmediateFn>),
    /// Asynchronous action; complete when its [`Done`] signal fires.
    Deferred(Arc<DeferredFn>),
    /// A dependency expression, parsed at expansion time so redefinitions
    /// made while an invocation is in flight are visible to it.
    Reference(String),
}

impl RuleBody {
    /// An immediate (synchronous) action body.
    pub fn immediate<F>(action: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        RuleBody::Immediate(Arc::new(action))
    }

    /// A deferred action body; `action` receives the completion signal.
    pub fn deferred<F>(action: F) -> Self
    where
        F: Fn(Done) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        RuleBody::Deferred(Arc::new(action))
    }

    /// A reference body: a dependency expression naming other rules.
    pub fn reference(expr: impl Into<String>) -> Self {
        RuleBody::Reference(expr.into())
    }

    /// Wrap an external [`AsyncAction`] collaborator as a deferred body.
    pub fn external(action: Arc<dyn AsyncAction>) -> Self {
        RuleBody::deferred(move |done| {
            action.start(done);
            Ok(())
        })
    }
}

impl From<&str> for RuleBody {
    fn from(expr: &str) -> Self {
        RuleBody::reference(expr)
    }
}

impl From<String> for RuleBody {
    fn from(expr: String) -> Self {
        RuleBody::reference(expr)
    }
}

impl fmt::Debug for RuleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleBody::Immediate(_) => f.write_str("Immediate(..)"),
            RuleBody::Deferred(_) => f.write_str("Deferred(..)"),
            RuleBody::Reference(expr) => write!(f, "Reference({expr:?})"),
        }
    }
}

/// Everything registered under one rule name: an ordered sequence of bodies.
///
/// Registering a second body under an existing name appends rather than
/// overwrites; invocation runs the bodies in registration order.
#[derive(Debug, Clone, Default)]
pub struct RuleDefinition {
    bodies: Vec<RuleBody>,
}

impl RuleDefinition {
    /// A definition holding a single body.
    pub fn new(body: RuleBody) -> Self {
        Self { bodies: vec![body] }
    }

    pub(crate) fn push(&mut self, body: RuleBody) {
        self.bodies.push(body);
    }

    /// The bodies in registration order.
    pub fn bodies(&self) -> &[RuleBody] {
        &self.bodies
    }

    /// Number of registered bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Body at `index`, if registered (used by the invoker, which re-reads
    /// the registry between bodies so mid-run appends are honoured).
    pub fn body_at(&self, index: usize) -> Option<RuleBody> {
        self.bodies.get(index).cloned()
    }
}
