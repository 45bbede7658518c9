//! Observability for the planning model
//!
//! Structured logging only: the model is a one-shot batch computation, so
//! there are no background collectors, no async, no metrics server.
//!
//! # Principles
//!
//! 1. Observability is read-only, no side effects on planning
//! 2. Synchronous, one JSON line per event
//! 3. Deterministic key ordering
//!
//! Events emitted by the index core:
//!
//! - `INDEX_DUPLICATE_ADD` (WARN) - an add with an id already held; the
//!   call is a tolerated no-op but worth a trace in the run log
//! - `INDEX_RESIZE` (TRACE) - a bucket doubled its capacity
//! - `INDEX_INVARIANT_BREACH` (FATAL) - a bucket could not re-place an
//!   entry; the accompanying error stops the run

mod logger;

pub use logger::{Logger, Severity};
