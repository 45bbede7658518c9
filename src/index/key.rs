//! Key values and typed key extractors
//!
//! A composite index is configured with one [`KeyExtractor`] per tree level.
//! The extractor is a named, typed accessor (`fn(&R) -> KeyValue`), so the
//! grouping dimensions of an index are fixed when it is constructed and
//! cannot drift from the record type.

use std::fmt;

use crate::record::{IdValue, Record, RecordId};

/// A grouping key value.
///
/// Equality compares the full value, never the hash alone: two distinct
/// values that collide under hashing are still distinct children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Text value
    Text(String),
    /// Record identity, used at the innermost (id) level
    Id(RecordId),
}

impl KeyValue {
    /// Create a text key
    pub fn text(v: impl Into<String>) -> Self {
        KeyValue::Text(v.into())
    }

    /// Create a key from a JSON value, for loaders handing over parsed rows.
    ///
    /// Arrays and objects are not usable as grouping keys.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(KeyValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_i64().map(KeyValue::Int),
            serde_json::Value::String(s) => Some(KeyValue::text(s.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(v) => write!(f, "{}", v),
            KeyValue::Int(v) => write!(f, "{}", v),
            KeyValue::Text(v) => write!(f, "{}", v),
            KeyValue::Id(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for KeyValue {
    fn from(v: bool) -> Self {
        KeyValue::Bool(v)
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Int(v)
    }
}

impl From<u32> for KeyValue {
    fn from(v: u32) -> Self {
        KeyValue::Int(v as i64)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::text(v)
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Text(v)
    }
}

impl From<&RecordId> for KeyValue {
    fn from(v: &RecordId) -> Self {
        KeyValue::Id(v.clone())
    }
}

impl From<&IdValue> for KeyValue {
    fn from(v: &IdValue) -> Self {
        match v {
            IdValue::Int(i) => KeyValue::Int(*i),
            IdValue::Text(t) => KeyValue::text(t),
        }
    }
}

/// A named, typed accessor for one grouping dimension of a record type.
///
/// Plain fn pointers keep extractors `Copy`, so a node can hand slices of
/// its remaining dimensions to children without allocation games.
pub struct KeyExtractor<R: Record> {
    name: &'static str,
    get: fn(&R) -> KeyValue,
}

impl<R: Record> KeyExtractor<R> {
    /// Create an extractor for a named dimension
    pub fn new(name: &'static str, get: fn(&R) -> KeyValue) -> Self {
        Self { name, get }
    }

    /// Extractor for the identity dimension, always the innermost level
    pub fn id() -> Self {
        Self::new("id", |r| KeyValue::Id(r.id().clone()))
    }

    /// Returns the dimension name, used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the extractor to a record
    pub fn key_of(&self, record: &R) -> KeyValue {
        (self.get)(record)
    }
}

// Derived Clone/Copy would put bounds on R; implement directly.
impl<R: Record> Clone for KeyExtractor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record> Copy for KeyExtractor<R> {}

impl<R: Record> fmt::Debug for KeyExtractor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExtractor")
            .field("name", &self.name)
            .finish()
    }
}

/// A bound constraint: a dimension plus the value every member of a node
/// (and its descendants) must carry for it.
#[derive(Debug)]
pub struct BoundPair<R: Record> {
    /// The constrained dimension
    pub extractor: KeyExtractor<R>,
    /// The required value
    pub value: KeyValue,
}

impl<R: Record> BoundPair<R> {
    /// Create a bound constraint
    pub fn new(extractor: KeyExtractor<R>, value: KeyValue) -> Self {
        Self { extractor, value }
    }

    /// Check a record against this constraint
    pub fn matches(&self, record: &R) -> bool {
        self.extractor.key_of(record) == self.value
    }
}

// Derived Clone would demand R: Clone; the pair never holds an R.
impl<R: Record> Clone for BoundPair<R> {
    fn clone(&self) -> Self {
        Self {
            extractor: self.extractor,
            value: self.value.clone(),
        }
    }
}
