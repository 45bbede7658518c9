//! CompositeIndex: the public entry point
//!
//! A named root [`GroupIndex`] configured with the full ordered dimension
//! list. The rest of the model instantiates one per concern (inventory,
//! demand, requirements-per-item, the lot board) and shares it with
//! collaborators through views only.

use crate::observability::Logger;
use crate::record::{Record, RecordId};

use super::errors::{IndexError, IndexResult};
use super::group::GroupIndex;
use super::key::{BoundPair, KeyExtractor, KeyValue};
use super::view::{GroupView, RecordView, View};

/// Hierarchical composite-key index over one record type.
///
/// Construction fixes the grouping dimensions; `add` takes custody of a
/// record, `remove` returns it, and every read goes through a view.
#[derive(Debug)]
pub struct CompositeIndex<R: Record> {
    name: &'static str,
    root: GroupIndex<R>,
}

impl<R: Record> CompositeIndex<R> {
    /// Create an index grouped by the given dimensions, outermost first.
    /// The innermost dimension should be [`KeyExtractor::id`].
    pub fn new(name: &'static str, unbound: Vec<KeyExtractor<R>>) -> Self {
        Self::with_bound(name, unbound, Vec::new())
    }

    /// Create an index whose members must all satisfy the given constraints
    /// (e.g. the requirements index for one item).
    pub fn with_bound(
        name: &'static str,
        unbound: Vec<KeyExtractor<R>>,
        bound: Vec<BoundPair<R>>,
    ) -> Self {
        Self {
            name,
            root: GroupIndex::new(unbound, bound),
        }
    }

    /// Create an index whose root bucket starts at the given capacity
    pub fn with_capacity(
        name: &'static str,
        unbound: Vec<KeyExtractor<R>>,
        capacity: usize,
    ) -> Self {
        Self {
            name,
            root: GroupIndex::with_capacity(unbound, Vec::new(), capacity),
        }
    }

    /// The index name, used in log events and diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of grouping dimensions
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Count of live top-level keys
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// True if the index holds no records
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Total records held
    pub fn n_items(&self) -> usize {
        self.root.n_items()
    }

    /// Insert a record, taking custody.
    ///
    /// Adding an id already present is a no-op; the model relies on that in
    /// several call sites, so it is kept, but surfaced as a WARN event.
    /// Fails with PropertyMismatch when the record violates a bound
    /// constraint, before any mutation.
    pub fn add(&mut self, record: R) -> IndexResult<()> {
        if self.root.contains_id(record.id()) {
            let id = record.id().to_string();
            Logger::warn(
                "INDEX_DUPLICATE_ADD",
                &[("index", self.name), ("id", id.as_str())],
            );
            return Ok(());
        }
        self.root.add(record)
    }

    /// Remove a record by id and return it, releasing custody
    pub fn remove(&mut self, id: &RecordId) -> IndexResult<R> {
        self.root.remove(id)
    }

    /// Read-only view of a record by id
    pub fn get(&self, id: &RecordId) -> IndexResult<RecordView<'_, R>> {
        self.root.get(id)
    }

    /// Resolve a key path of length 0..=depth (see [`GroupIndex::get_path`])
    pub fn get_path(&self, path: &[KeyValue]) -> IndexResult<View<'_, R>> {
        self.root.get_path(path)
    }

    /// True iff the path names a live member
    pub fn contains(&self, path: &[KeyValue]) -> bool {
        self.root.contains(path)
    }

    /// True if the id is held anywhere in the index
    pub fn contains_id(&self, id: &RecordId) -> bool {
        self.root.contains_id(id)
    }

    /// Live top-level keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &KeyValue> {
        self.root.keys()
    }

    /// Read-only view of the whole index
    pub fn view(&self) -> GroupView<'_, R> {
        self.root.view()
    }

    /// Apply a closure to a held record.
    ///
    /// This is the only mutation path into a grouped record. The closure
    /// receives `&mut R`; record kinds gate their setters through
    /// [`Record::guard_mutation`], so kinds that do not allow mutation
    /// while grouped reject here with CustodyViolation. The error type is
    /// anything an [`IndexError`] converts into, so domain setters can be
    /// called directly.
    pub fn update<T, E>(
        &mut self,
        id: &RecordId,
        apply: impl FnOnce(&mut R) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<IndexError>,
    {
        let record = self.root.record_mut(id).map_err(E::from)?;
        apply(record)
    }
}
