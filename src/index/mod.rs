//! Hierarchical composite-key index
//!
//! The load-bearing structure of the planning model: every subsystem stores
//! its records here, categorized by an ordered list of grouping dimensions.
//! A [`CompositeIndex`] is a tree of [`GroupIndex`] nodes over a hand-rolled
//! open-addressing table ([`HashBucket`]), terminating in [`Atom`] leaves
//! that hold exactly one record each.
//!
//! # Design Principles
//!
//! - Single custody: a record lives in exactly one slot of exactly one index
//! - Validation before mutation: a rejected add leaves no trace
//! - O(1) point access per level via id-to-subkey side maps
//! - Deterministic: fixed-key hashing, FIFO iteration, stable across resize
//! - Reads go through views; views cannot mutate
//!
//! # Invariants
//!
//! - Bucket load factor stays below 0.8 after every insert
//! - Iteration order is insertion order, independent of slot placement
//! - Every occupied child holds at least one record (emptied children are
//!   pruned on remove)
//! - Recoverable errors never corrupt index state

mod atom;
mod bucket;
mod composite;
mod errors;
mod group;
mod key;
mod view;

pub use atom::Atom;
pub use bucket::HashBucket;
pub use composite::CompositeIndex;
pub use errors::{IndexError, IndexResult, Severity};
pub use group::GroupIndex;
pub use key::{BoundPair, KeyExtractor, KeyValue};
pub use view::{GroupView, RecordView, View};
