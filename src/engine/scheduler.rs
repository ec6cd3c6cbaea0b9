// src/engine/scheduler.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::errors::EngineError;
use crate::expr::Expression;
use crate::registry::Registry;
use crate::rule::{Done, RuleBody, RuleDefinition};

/// Terminal outcome of one rule, broadcast to later references of the same
/// name within the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleOutcome {
    Success,
    Failed,
}

/// Shareable handle on a triggered rule's completion.
type CompletionFut = Shared<BoxFuture<'static, RuleOutcome>>;

/// Result of asking the invocation to trigger a name.
enum Trigger {
    /// First reference: the caller must invoke the rule and report its
    /// outcome through the sender.
    First(oneshot::Sender<RuleOutcome>),
    /// Already triggered elsewhere in this invocation: the caller must not
    /// re-invoke, but may only count the name as satisfied once this future
    /// resolves.
    InFlight(CompletionFut),
}

/// Per-invocation state: one completion future per triggered rule name.
///
/// Owned exclusively by the stage walk for the duration of one `run` call.
/// A name enters the map at most once, no matter how many stages or branches
/// of the expression (including those introduced by reference expansion)
/// mention it; every reference after the first waits on the stored future
/// instead of re-invoking the rule.
#[derive(Default)]
struct Invocation {
    completions: Mutex<HashMap<String, CompletionFut>>,
}

impl Invocation {
    fn trigger(&self, name: &str) -> Trigger {
        let mut completions = self.completions.lock().unwrap();

        if let Some(completion) = completions.get(name) {
            return Trigger::InFlight(completion.clone());
        }

        let (tx, rx) = oneshot::channel();
        // A dropped sender means the triggering branch was abandoned; the
        // rule can never succeed, so waiters see a failure.
        let completion = rx
            .map(|outcome| outcome.unwrap_or(RuleOutcome::Failed))
            .boxed()
            .shared();
        completions.insert(name.to_string(), completion);

        Trigger::First(tx)
    }
}

/// The rule engine: registry handle plus the invocation scheduler.
///
/// Cheap to clone; clones share the same registry, so an action can capture
/// a clone and register further rules on the fly. Configuration methods
/// return `&Self` for chaining:
///
/// ```no_run
/// use cascade::{Engine, RuleBody};
///
/// let engine = Engine::new();
/// engine
///     .rule("fmt", RuleBody::immediate(|| Ok(())))
///     .rule("build", RuleBody::immediate(|| Ok(())))
///     .rule("all", "fmt > build");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: Arc<Registry>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the shared registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a body under `name`. Appends if the name already has a
    /// definition; bodies run in registration order.
    pub fn rule(&self, name: &str, body: impl Into<RuleBody>) -> &Self {
        self.registry.set(name, body.into());
        self
    }

    /// The definition registered under `name`, or `None`. Unknown names are
    /// not an error: as a dependency they complete as a no-op.
    pub fn definition(&self, name: &str) -> Option<RuleDefinition> {
        self.registry.get(name)
    }

    /// Drop the whole definition for `name`.
    pub fn remove_rule(&self, name: &str) -> &Self {
        self.registry.remove(name);
        self
    }

    /// Drop every registered rule.
    pub fn clear_rules(&self) -> &Self {
        self.registry.clear();
        self
    }

    /// Bulk registration: apply [`rule`](Self::rule) for every entry, in
    /// iteration order. Entries are independent; there is no rollback.
    pub fn rules<I, N, B>(&self, entries: I) -> &Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: AsRef<str>,
        B: Into<RuleBody>,
    {
        self.registry
            .set_many(entries.into_iter().map(|(name, body)| (name, body.into())));
        self
    }

    /// Run a dependency expression to completion.
    ///
    /// The returned future resolves once every rule the expression references
    /// (directly or through reference expansion) has completed exactly once.
    /// Stages run strictly in order; rules within a stage run concurrently.
    pub async fn run(&self, expression: &str) -> Result<(), EngineError> {
        let expr = Expression::parse(expression);
        info!(
            expression,
            stages = expr.stages().len(),
            "invocation started"
        );

        let invocation = Arc::new(Invocation::default());
        let result = self.drive(expr, invocation, Arc::new(Vec::new())).await;

        match &result {
            Ok(()) => info!(expression, "invocation complete"),
            Err(err) => warn!(expression, rule = err.rule(), error = %err, "invocation failed"),
        }
        result
    }

    /// Run `setup` synchronously (typically to register rules just in time),
    /// then run the expression. Rules registered by `setup` are visible to
    /// the parse and to every expansion of this invocation.
    pub async fn run_with_setup<F>(&self, setup: F, expression: &str) -> Result<(), EngineError>
    where
        F: FnOnce(),
    {
        setup();
        self.run(expression).await
    }

    /// Walk an expression's stages. Reentrant: reference bodies drive their
    /// sub-expression through here with the same invocation state, so the
    /// dedupe map spans the whole expansion tree.
    ///
    /// `path` is the chain of rule names whose expansion this walk is part
    /// of. A stage mentioning one of them is referencing a rule inside its
    /// own expansion; waiting on its completion there would be a deadlock,
    /// so such names short-circuit instead (this is what terminates
    /// self-referential rule graphs).
    fn drive(
        &self,
        expr: Expression,
        invocation: Arc<Invocation>,
        path: Arc<Vec<String>>,
    ) -> BoxFuture<'_, Result<(), EngineError>> {
        async move {
            for (index, stage) in expr.stages().iter().enumerate() {
                let mut in_flight: Vec<BoxFuture<'_, Result<(), EngineError>>> = Vec::new();

                for name in stage.names() {
                    if path.contains(name) {
                        debug!(rule = %name, stage = index, "reference inside own expansion; counting as satisfied");
                        continue;
                    }

                    match invocation.trigger(name) {
                        Trigger::First(report) => {
                            let invoke =
                                self.invoke(name.clone(), Arc::clone(&invocation), Arc::clone(&path));
                            in_flight.push(
                                async move {
                                    let result = invoke.await;
                                    let outcome = if result.is_ok() {
                                        RuleOutcome::Success
                                    } else {
                                        RuleOutcome::Failed
                                    };
                                    let _ = report.send(outcome);
                                    result
                                }
                                .boxed(),
                            );
                        }
                        Trigger::InFlight(completion) => {
                            // Not re-invoked, but the stage only advances
                            // once the first invocation finishes.
                            let rule = name.clone();
                            in_flight.push(
                                async move {
                                    debug!(rule = %rule, "rule already triggered; waiting for its completion");
                                    match completion.await {
                                        RuleOutcome::Success => Ok(()),
                                        RuleOutcome::Failed => {
                                            Err(EngineError::DependencyFailed { rule })
                                        }
                                    }
                                }
                                .boxed(),
                            );
                        }
                    }
                }

                if in_flight.is_empty() {
                    // Nothing to wait for; advance synchronously.
                    continue;
                }

                debug!(stage = index, rules = in_flight.len(), "stage started");

                // Siblings run to their own completion even if one fails;
                // only then is the first error surfaced.
                let results = future::join_all(in_flight).await;
                for result in results {
                    result?;
                }

                debug!(stage = index, "stage complete");
            }

            Ok(())
        }
        .boxed()
    }

    /// Invoke one rule: run every body registered under `name`, in
    /// registration order.
    ///
    /// The registry is re-read per body index rather than snapshotted, so a
    /// body appended to `name` by an earlier body of the same rule still
    /// runs in this pass, and a redefinition made elsewhere mid-invocation
    /// is visible to later expansions.
    fn invoke(
        &self,
        name: String,
        invocation: Arc<Invocation>,
        path: Arc<Vec<String>>,
    ) -> BoxFuture<'_, Result<(), EngineError>> {
        async move {
            // Ancestry for reference bodies: this rule's expansions must not
            // wait on the rule itself.
            let expansion_path = {
                let mut p = Vec::with_capacity(path.len() + 1);
                p.extend(path.iter().cloned());
                p.push(name.clone());
                Arc::new(p)
            };

            let mut index = 0;

            while let Some(body) = self.registry.body_at(&name, index) {
                match body {
                    RuleBody::Immediate(action) => {
                        debug!(rule = %name, index, "running immediate action");
                        action().map_err(|source| EngineError::ActionFailed {
                            rule: name.clone(),
                            source,
                        })?;
                    }
                    RuleBody::Deferred(action) => {
                        let (done, completion) = Done::new(&name);
                        debug!(rule = %name, index, "starting deferred action");
                        action(done).map_err(|source| EngineError::ActionFailed {
                            rule: name.clone(),
                            source,
                        })?;

                        match completion.await {
                            Ok(Ok(())) => {}
                            Ok(Err(source)) => {
                                return Err(EngineError::ActionFailed {
                                    rule: name.clone(),
                                    source,
                                });
                            }
                            Err(_) => {
                                warn!(rule = %name, "completion signal dropped");
                                return Err(EngineError::CompletionDropped {
                                    rule: name.clone(),
                                });
                            }
                        }
                    }
                    RuleBody::Reference(expr) => {
                        debug!(rule = %name, expression = %expr, "expanding reference");
                        let sub = Expression::parse(&expr);
                        self.drive(sub, Arc::clone(&invocation), Arc::clone(&expansion_path))
                            .await?;
                    }
                }

                index += 1;
            }

            if index == 0 {
                // Never registered: a no-op success, not an error.
                debug!(rule = %name, "unknown rule; completing as no-op");
            }

            Ok(())
        }
        .boxed()
    }
}
