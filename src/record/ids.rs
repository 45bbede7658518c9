//! Record identity and id generation
//!
//! Ids are assigned by an explicit, injectable [`IdGenerator`] owned by
//! whichever collaborator constructs the records (a loader, usually) and
//! scoped to a single planning run. There is no global counter.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The value half of a record identity: integer or text.
///
/// Loaders keep whatever the spreadsheet gave them (roll barcodes are
/// integers, order numbers are text), so both forms are first-class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdValue {
    /// Integer identity
    Int(i64),
    /// Text identity
    Text(String),
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Int(v) => write!(f, "{}", v),
            IdValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for IdValue {
    fn from(v: i64) -> Self {
        IdValue::Int(v)
    }
}

impl From<&str> for IdValue {
    fn from(v: &str) -> Self {
        IdValue::Text(v.to_string())
    }
}

impl From<String> for IdValue {
    fn from(v: String) -> Self {
        IdValue::Text(v)
    }
}

/// Stable identity of a record: a kind prefix plus an id value.
///
/// The prefix is the type tag that keeps ids of different record kinds
/// distinct under equality and hashing ("roll 12" never equals "order 12").
/// Immutable for the record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    // Cow, not &'static str: interchange deserializes into an owned prefix.
    prefix: Cow<'static, str>,
    value: IdValue,
}

impl RecordId {
    /// Create an id from a prefix and any id value
    pub fn new(prefix: &'static str, value: impl Into<IdValue>) -> Self {
        Self {
            prefix: Cow::Borrowed(prefix),
            value: value.into(),
        }
    }

    /// Create an integer id
    pub fn int(prefix: &'static str, value: i64) -> Self {
        Self::new(prefix, IdValue::Int(value))
    }

    /// Create a text id
    pub fn text(prefix: &'static str, value: impl Into<String>) -> Self {
        Self::new(prefix, IdValue::Text(value.into()))
    }

    /// Returns the kind prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the id value
    pub fn value(&self) -> &IdValue {
        &self.value
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.value)
    }
}

/// Sequential id generator for one record kind.
///
/// Owned by the collaborator that constructs records; one generator per
/// prefix per planning run. Deterministic: the n-th call always yields n.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: &'static str,
    next: i64,
}

impl IdGenerator {
    /// Create a generator starting at 1
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Create a generator starting at a given value (e.g. resuming after
    /// ids already taken from a spreadsheet)
    pub fn starting_at(prefix: &'static str, first: i64) -> Self {
        Self {
            prefix,
            next: first,
        }
    }

    /// Returns the prefix this generator stamps onto ids
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Yield the next id
    pub fn next_id(&mut self) -> RecordId {
        let id = RecordId::int(self.prefix, self.next);
        self.next += 1;
        id
    }
}
