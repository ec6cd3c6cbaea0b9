// src/engine/mod.rs

//! The invocation scheduler.
//!
//! [`scheduler`] owns the per-invocation state machine: it walks the parsed
//! stage sequence, triggers all rules of a stage concurrently, advances only
//! when the whole stage has completed, and guarantees at-most-once execution
//! per rule name per invocation (the dedupe invariant that makes diamond
//! dependencies safe).

pub mod scheduler;

pub use scheduler::Engine;
