//! Read-only views over index nodes and records
//!
//! A view holds a shared reference, never ownership and never a copy, so it
//! always reflects live state. Immutability is enforced by the type system:
//! the wrappers expose no mutating operations, so a collaborator holding a
//! view cannot restructure the index or rewrite a record.

use std::fmt;
use std::ops::Deref;

use crate::record::{Record, RecordId};

use super::errors::IndexResult;
use super::group::{GroupIndex, Node};
use super::key::KeyValue;

/// Result of a key-path lookup: a sub-tree or, at full depth, a record.
#[derive(Debug)]
pub enum View<'a, R: Record> {
    /// A group node (path shorter than the index depth)
    Group(GroupView<'a, R>),
    /// A record (path of full depth)
    Record(RecordView<'a, R>),
}

impl<'a, R: Record> View<'a, R> {
    /// Records reachable through this view
    pub fn n_items(&self) -> usize {
        match self {
            View::Group(group) => group.n_items(),
            View::Record(_) => 1,
        }
    }

    /// The group view, if this is a sub-tree
    pub fn as_group(&self) -> Option<&GroupView<'a, R>> {
        match self {
            View::Group(group) => Some(group),
            View::Record(_) => None,
        }
    }

    /// The record view, if the path resolved to full depth
    pub fn as_record(&self) -> Option<&RecordView<'a, R>> {
        match self {
            View::Record(record) => Some(record),
            View::Group(_) => None,
        }
    }

    /// Indented rendering of the sub-tree, for diagnostics
    pub fn pretty(&self) -> String {
        match self {
            View::Group(group) => group.pretty(),
            View::Record(record) => format!("{}\n", record.id()),
        }
    }
}

/// Read proxy over a [`GroupIndex`] node.
pub struct GroupView<'a, R: Record> {
    node: &'a GroupIndex<R>,
}

impl<'a, R: Record> GroupView<'a, R> {
    pub(super) fn new(node: &'a GroupIndex<R>) -> Self {
        Self { node }
    }

    /// Count of live direct children
    pub fn len(&self) -> usize {
        self.node.len()
    }

    /// True if nothing is held below the node
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Records held below the node
    pub fn n_items(&self) -> usize {
        self.node.n_items()
    }

    /// Unresolved dimensions below the node
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    /// Dimension resolved at the node
    pub fn dimension(&self) -> &'static str {
        self.node.dimension()
    }

    /// Live child keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &'a KeyValue> {
        self.node.keys()
    }

    /// True iff the path names a live member
    pub fn contains(&self, path: &[KeyValue]) -> bool {
        self.node.contains(path)
    }

    /// True if the id is held below the node
    pub fn contains_id(&self, id: &RecordId) -> bool {
        self.node.contains_id(id)
    }

    /// Resolve a key path below the node
    pub fn get_path(&self, path: &[KeyValue]) -> IndexResult<View<'a, R>> {
        self.node.get_path(path)
    }

    /// Read-only view of a record by id
    pub fn get(&self, id: &RecordId) -> IndexResult<RecordView<'a, R>> {
        self.node.get(id)
    }

    /// Indented rendering of the sub-tree, one line per key, records as
    /// their ids. Deterministic: children appear in insertion order.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        render(self.node, 0, &mut out);
        out
    }
}

fn render<R: Record>(node: &GroupIndex<R>, indent: usize, out: &mut String) {
    for (key, child) in node.children() {
        for _ in 0..indent {
            out.push_str("  ");
        }
        match child {
            Node::Group(group) => {
                out.push_str(&format!(
                    "{}={} ({} records)\n",
                    node.dimension(),
                    key,
                    group.n_items()
                ));
                render(group, indent + 1, out);
            }
            Node::Atom(atom) => {
                if let Some(record) = atom.record() {
                    out.push_str(&format!("{}\n", record.id()));
                }
            }
        }
    }
}

impl<'a, R: Record> fmt::Debug for GroupView<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupView")
            .field("dimension", &self.dimension())
            .field("depth", &self.depth())
            .field("n_items", &self.n_items())
            .finish()
    }
}

/// Read proxy over a single record. Derefs to `&R`, so every `&self`
/// accessor of the record type is readable through it; setters need
/// `&mut R` and are unreachable.
pub struct RecordView<'a, R: Record> {
    record: &'a R,
}

impl<'a, R: Record> RecordView<'a, R> {
    pub(super) fn new(record: &'a R) -> Self {
        Self { record }
    }

    /// The record's identity
    pub fn id(&self) -> &'a RecordId {
        self.record.id()
    }
}

impl<'a, R: Record> Deref for RecordView<'a, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.record
    }
}

impl<'a, R: Record> fmt::Debug for RecordView<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView").field("id", &self.id()).finish()
    }
}
