//! GroupIndex: recursive multi-key container
//!
//! A node categorizes records by the value of its first unbound dimension;
//! each distinct value owns a child (another group one level shallower, or
//! an atom once only the id remains). Children are materialized lazily on
//! first add. An id-to-subkey side map at every level lets removal and point
//! lookup descend directly instead of scanning.
//!
//! # Invariants
//!
//! - Bound constraints are validated before any mutation
//! - Every record below a node has an entry in that node's side map
//! - Every child present in the bucket holds at least one record: a child
//!   emptied by removal is pruned on the spot
//! - A record is reachable from exactly one path from the root

use std::collections::HashMap;

use crate::record::{Record, RecordId};

use super::atom::Atom;
use super::bucket::HashBucket;
use super::errors::{IndexError, IndexResult};
use super::key::{BoundPair, KeyExtractor, KeyValue};
use super::view::{GroupView, RecordView, View};

/// A child of a group node.
#[derive(Debug)]
pub(super) enum Node<R: Record> {
    /// Intermediate node, one dimension shallower
    Group(GroupIndex<R>),
    /// Terminal holder, id resolved
    Atom(Atom<R>),
}

impl<R: Record> Node<R> {
    /// Records held below this child
    pub(super) fn n_items(&self) -> usize {
        match self {
            Node::Group(group) => group.n_items(),
            Node::Atom(atom) => atom.len(),
        }
    }

    fn add(&mut self, record: R) -> IndexResult<()> {
        match self {
            Node::Group(group) => group.add(record),
            Node::Atom(atom) => atom.add(record),
        }
    }

    fn remove(&mut self, id: &RecordId) -> IndexResult<R> {
        match self {
            Node::Group(group) => group.remove(id),
            Node::Atom(atom) => atom.remove(id),
        }
    }

    fn get(&self, id: &RecordId) -> IndexResult<RecordView<'_, R>> {
        match self {
            Node::Group(group) => group.get(id),
            Node::Atom(atom) => atom.get(id),
        }
    }

    fn record_mut(&mut self, id: &RecordId) -> IndexResult<&mut R> {
        match self {
            Node::Group(group) => group.record_mut(id),
            Node::Atom(atom) => match atom.record_mut() {
                Some(record) if record.id() == id => Ok(record),
                _ => Err(IndexError::id_not_found(id.clone())),
            },
        }
    }

    fn get_path<'a>(&'a self, path: &[KeyValue]) -> IndexResult<View<'a, R>> {
        match self {
            Node::Group(group) => group.get_path(path),
            Node::Atom(atom) => {
                if !path.is_empty() {
                    return Err(IndexError::dimension_mismatch(path.len(), 0));
                }
                match atom.record() {
                    Some(record) => Ok(View::Record(RecordView::new(record))),
                    None => Err(IndexError::path_not_found(
                        atom.bound()
                            .iter()
                            .map(|pair| (pair.extractor.name(), pair.value.clone()))
                            .collect(),
                    )),
                }
            }
        }
    }
}

/// Recursive node categorizing records by an ordered list of dimensions.
///
/// Depth is the number of unresolved dimensions (at least 1); a node of
/// depth 1 parents atoms. Use [`super::CompositeIndex`] to build the root.
#[derive(Debug)]
pub struct GroupIndex<R: Record> {
    /// Remaining dimensions, first one applies at this node
    unbound: Vec<KeyExtractor<R>>,
    /// Constraints inherited from ancestors, extended one pair per level
    bound: Vec<BoundPair<R>>,
    /// Children keyed by the value of the first unbound dimension
    children: HashBucket<KeyValue, Node<R>>,
    /// id -> subkey, for O(1) point removal and lookup
    members: HashMap<RecordId, KeyValue>,
}

impl<R: Record> GroupIndex<R> {
    /// Create a node. At least one dimension is required; the innermost
    /// dimension is conventionally [`KeyExtractor::id`].
    pub fn new(unbound: Vec<KeyExtractor<R>>, bound: Vec<BoundPair<R>>) -> Self {
        Self::with_capacity(unbound, bound, 0)
    }

    /// Create a node whose bucket starts at the given capacity
    pub fn with_capacity(
        unbound: Vec<KeyExtractor<R>>,
        bound: Vec<BoundPair<R>>,
        capacity: usize,
    ) -> Self {
        assert!(
            !unbound.is_empty(),
            "a group index needs at least one grouping dimension"
        );
        Self {
            unbound,
            bound,
            children: HashBucket::with_capacity(capacity),
            members: HashMap::new(),
        }
    }

    /// Number of unresolved dimensions below this node
    pub fn depth(&self) -> usize {
        self.unbound.len()
    }

    /// Dimension resolved at this node
    pub fn dimension(&self) -> &'static str {
        self.unbound[0].name()
    }

    /// Constraints every member must satisfy
    pub fn bound(&self) -> &[BoundPair<R>] {
        &self.bound
    }

    /// Count of direct children (every child is live, see module invariants)
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if no records are held below this node
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Records held below this node. Every one of them has a side-map entry
    /// here, so the subtree count is the side map's size.
    pub fn n_items(&self) -> usize {
        self.members.len()
    }

    /// True if the id is held below this node
    pub fn contains_id(&self, id: &RecordId) -> bool {
        self.members.contains_key(id)
    }

    /// Live child keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &KeyValue> {
        self.children.keys()
    }

    pub(super) fn children(&self) -> impl Iterator<Item = (&KeyValue, &Node<R>)> {
        self.children.iter()
    }

    /// Insert a record, taking custody.
    ///
    /// Validates the node's constraints before any mutation, then descends
    /// by the first unbound dimension, materializing the child on first use.
    /// Adding an id already present is a no-op.
    pub fn add(&mut self, record: R) -> IndexResult<()> {
        if self.members.contains_key(record.id()) {
            return Ok(());
        }
        for pair in &self.bound {
            let actual = pair.extractor.key_of(&record);
            if actual != pair.value {
                return Err(IndexError::property_mismatch(
                    pair.extractor.name(),
                    pair.value.clone(),
                    actual,
                ));
            }
        }

        let extractor = self.unbound[0];
        let subkey = extractor.key_of(&record);
        let id = record.id().clone();

        if !self.children.contains(&subkey) {
            let mut child_bound = self.bound.clone();
            child_bound.push(BoundPair::new(extractor, subkey.clone()));
            let child = if self.unbound.len() == 1 {
                Node::Atom(Atom::new(child_bound))
            } else {
                Node::Group(GroupIndex::new(self.unbound[1..].to_vec(), child_bound))
            };
            self.children.insert(subkey.clone(), child)?;
        }

        match self.children.get_mut(&subkey) {
            Some(child) => child.add(record)?,
            None => {
                return Err(IndexError::invariant_breach(
                    "materialized child missing from bucket",
                ))
            }
        }
        self.members.insert(id, subkey);
        Ok(())
    }

    /// Remove a record by id and return it, releasing custody.
    ///
    /// Descends through the side maps without scanning. A child emptied by
    /// the removal is pruned.
    pub fn remove(&mut self, id: &RecordId) -> IndexResult<R> {
        let subkey = match self.members.get(id) {
            Some(subkey) => subkey.clone(),
            None => return Err(IndexError::id_not_found(id.clone())),
        };
        let record = match self.children.get_mut(&subkey) {
            Some(child) => child.remove(id)?,
            None => {
                return Err(IndexError::invariant_breach(
                    "side map names a child missing from bucket",
                ))
            }
        };
        self.members.remove(id);

        let emptied = self
            .children
            .get(&subkey)
            .map(|child| child.n_items() == 0)
            .unwrap_or(false);
        if emptied {
            self.children.remove(&subkey);
        }
        Ok(record)
    }

    /// Read-only view of a record by id
    pub fn get(&self, id: &RecordId) -> IndexResult<RecordView<'_, R>> {
        let subkey = self
            .members
            .get(id)
            .ok_or_else(|| IndexError::id_not_found(id.clone()))?;
        match self.children.get(subkey) {
            Some(child) => child.get(id),
            None => Err(IndexError::invariant_breach(
                "side map names a child missing from bucket",
            )),
        }
    }

    /// Mutable access to a held record, for custody-checked setters
    pub(super) fn record_mut(&mut self, id: &RecordId) -> IndexResult<&mut R> {
        let subkey = self
            .members
            .get(id)
            .ok_or_else(|| IndexError::id_not_found(id.clone()))?
            .clone();
        match self.children.get_mut(&subkey) {
            Some(child) => child.record_mut(id),
            None => Err(IndexError::invariant_breach(
                "side map names a child missing from bucket",
            )),
        }
    }

    /// Resolve a key path of length 0..=depth.
    ///
    /// The empty path views this node; a full path views the record itself.
    /// Longer paths are a dimension mismatch reported with this node's
    /// depth; a dead key is reported with every attribute/value pair tried
    /// on the way down.
    pub fn get_path<'a>(&'a self, path: &[KeyValue]) -> IndexResult<View<'a, R>> {
        if path.is_empty() {
            return Ok(View::Group(GroupView::new(self)));
        }
        if path.len() > self.depth() {
            return Err(IndexError::dimension_mismatch(path.len(), self.depth()));
        }
        let subkey = &path[0];
        match self.children.get(subkey) {
            Some(child) => child.get_path(&path[1..]),
            None => {
                let mut tried: Vec<(&'static str, KeyValue)> = self
                    .bound
                    .iter()
                    .map(|pair| (pair.extractor.name(), pair.value.clone()))
                    .collect();
                tried.push((self.dimension(), subkey.clone()));
                Err(IndexError::path_not_found(tried))
            }
        }
    }

    /// True iff the path names a live member (node or record)
    pub fn contains(&self, path: &[KeyValue]) -> bool {
        self.get_path(path).is_ok()
    }

    /// Read-only view of this node
    pub fn view(&self) -> GroupView<'_, R> {
        GroupView::new(self)
    }
}
