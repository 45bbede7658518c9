//! dyeplan - A strict, deterministic, in-memory production-planning model
//! for a textile dyeing mill
//!
//! Rolls of greige fabric are tracked in inventory, grouped by style, width
//! and shade, matched against open order lines, and packed into dye-lots
//! that are scheduled onto dyeing machines. The load-bearing structure is
//! the hierarchical composite-key index in [`index`]: every higher-level
//! subsystem stores its records there, under single-custody, categorized by
//! an ordered list of grouping attributes.
//!
//! The model is a one-shot, single-threaded batch computation. Nothing here
//! persists to disk, listens on a socket, or spawns a task.

pub mod domain;
pub mod index;
pub mod observability;
pub mod record;
