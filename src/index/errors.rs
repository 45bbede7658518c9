//! Index error types
//!
//! Error codes:
//! - PLAN_PROPERTY_MISMATCH (RECOVERABLE)
//! - PLAN_NOT_FOUND (RECOVERABLE)
//! - PLAN_DIMENSION_MISMATCH (RECOVERABLE)
//! - PLAN_CUSTODY_VIOLATION (RECOVERABLE)
//! - PLAN_INVARIANT_BREACH (FATAL)
//!
//! Recoverable errors are meant for the immediate caller (e.g. "skip rolls
//! that don't translate") and are raised before any mutation, so index state
//! is never corrupted by a rejected call. InvariantBreach means structural
//! corruption and must stop the run.

use std::fmt;

use crate::record::RecordId;

use super::key::KeyValue;

/// Severity levels for index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected failure, handled by the immediate caller
    Recoverable,
    /// Structural corruption, the run must halt
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "RECOVERABLE"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Index error type with full context
#[derive(Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A record's bound attributes disagree with the node's constraints
    PropertyMismatch {
        /// Attribute the node is bound on
        attribute: &'static str,
        /// Value the node requires
        expected: KeyValue,
        /// Value the record carries
        actual: KeyValue,
    },
    /// An id or key path with no live member
    NotFound {
        /// Attribute/value pairs tried before the lookup failed
        path: Vec<(&'static str, KeyValue)>,
        /// Id that was looked up, if the lookup was by id
        id: Option<RecordId>,
    },
    /// A key path longer than the node's remaining depth
    DimensionMismatch {
        /// Path length the caller supplied
        given: usize,
        /// Depth of the node that rejected it
        expected: usize,
    },
    /// Mutation of a record while it is held by an index node
    CustodyViolation {
        /// Id of the held record
        id: RecordId,
    },
    /// The table could not re-place an occupied slot (hashing or state bug)
    InvariantBreach {
        /// What the structure was doing when the breach surfaced
        message: String,
    },
}

impl IndexError {
    /// Create a property-mismatch error
    pub fn property_mismatch(
        attribute: &'static str,
        expected: KeyValue,
        actual: KeyValue,
    ) -> Self {
        IndexError::PropertyMismatch {
            attribute,
            expected,
            actual,
        }
    }

    /// Create a not-found error for an id lookup
    pub fn id_not_found(id: RecordId) -> Self {
        IndexError::NotFound {
            path: Vec::new(),
            id: Some(id),
        }
    }

    /// Create a not-found error for a key-path lookup
    pub fn path_not_found(path: Vec<(&'static str, KeyValue)>) -> Self {
        IndexError::NotFound { path, id: None }
    }

    /// Create a dimension-mismatch error
    pub fn dimension_mismatch(given: usize, expected: usize) -> Self {
        IndexError::DimensionMismatch { given, expected }
    }

    /// Create a custody-violation error
    pub fn custody_violation(id: RecordId) -> Self {
        IndexError::CustodyViolation { id }
    }

    /// Create an invariant-breach error
    pub fn invariant_breach(message: impl Into<String>) -> Self {
        IndexError::InvariantBreach {
            message: message.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::PropertyMismatch { .. } => "PLAN_PROPERTY_MISMATCH",
            IndexError::NotFound { .. } => "PLAN_NOT_FOUND",
            IndexError::DimensionMismatch { .. } => "PLAN_DIMENSION_MISMATCH",
            IndexError::CustodyViolation { .. } => "PLAN_CUSTODY_VIOLATION",
            IndexError::InvariantBreach { .. } => "PLAN_INVARIANT_BREACH",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            IndexError::InvariantBreach { .. } => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    /// Returns whether this error must stop the run
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.severity(), self.code())?;
        match self {
            IndexError::PropertyMismatch {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "record has {}={}, node is bound to {}={}",
                attribute, actual, attribute, expected
            ),
            IndexError::NotFound { path, id } => {
                if let Some(id) = id {
                    write!(f, "no record with id {}", id)?;
                } else {
                    write!(f, "no live member")?;
                }
                if !path.is_empty() {
                    write!(f, " under ")?;
                    for (i, (name, value)) in path.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}={}", name, value)?;
                    }
                }
                Ok(())
            }
            IndexError::DimensionMismatch { given, expected } => write!(
                f,
                "key path of length {} on a node of depth {}",
                given, expected
            ),
            IndexError::CustodyViolation { id } => write!(
                f,
                "record {} is held by an index and does not allow mutation while grouped",
                id
            ),
            IndexError::InvariantBreach { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    #[test]
    fn test_error_codes_are_stable() {
        let errs = [
            IndexError::property_mismatch("style", KeyValue::text("A"), KeyValue::text("B")),
            IndexError::id_not_found(RecordId::int("roll", 1)),
            IndexError::dimension_mismatch(4, 3),
            IndexError::custody_violation(RecordId::int("order", 2)),
            IndexError::invariant_breach("resize failed"),
        ];
        let codes: Vec<&str> = errs.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec![
                "PLAN_PROPERTY_MISMATCH",
                "PLAN_NOT_FOUND",
                "PLAN_DIMENSION_MISMATCH",
                "PLAN_CUSTODY_VIOLATION",
                "PLAN_INVARIANT_BREACH",
            ]
        );
    }

    #[test]
    fn test_only_invariant_breach_is_fatal() {
        assert!(IndexError::invariant_breach("x").is_fatal());
        assert!(!IndexError::dimension_mismatch(1, 0).is_fatal());
        assert!(!IndexError::id_not_found(RecordId::int("roll", 7)).is_fatal());
    }

    #[test]
    fn test_not_found_display_lists_path() {
        let err = IndexError::path_not_found(vec![
            ("style", KeyValue::text("GX-114")),
            ("width", KeyValue::Int(180)),
        ]);
        let display = format!("{}", err);
        assert!(display.contains("PLAN_NOT_FOUND"));
        assert!(display.contains("style=GX-114"));
        assert!(display.contains("width=180"));
    }

    #[test]
    fn test_dimension_mismatch_display_names_both_depths() {
        let display = format!("{}", IndexError::dimension_mismatch(4, 3));
        assert!(display.contains("length 4"));
        assert!(display.contains("depth 3"));
    }
}
