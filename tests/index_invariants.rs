//! Composite Index Invariant Tests
//!
//! Tests for the core contract:
//! - Add/remove round-trips restore membership and counts
//! - Duplicate adds are no-ops
//! - Bound-property gating rejects before mutation
//! - Depth-tuple lookup, dimension mismatch, not-found diagnostics
//! - Emptied children are pruned

use dyeplan::index::{CompositeIndex, IndexError, KeyExtractor, KeyValue};
use dyeplan::record::{Custody, Record, RecordId};

// =============================================================================
// Test Record
// =============================================================================

/// A minimal record with two grouping attributes, item and size.
#[derive(Debug)]
struct Piece {
    id: RecordId,
    item: String,
    size: String,
    custody: Custody,
}

impl Piece {
    fn new(id: i64, item: &str, size: &str) -> Self {
        Self {
            id: RecordId::int("piece", id),
            item: item.to_string(),
            size: size.to_string(),
            custody: Custody::free(),
        }
    }
}

impl Record for Piece {
    const MUTABLE_WHILE_GROUPED: bool = false;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn custody(&self) -> &Custody {
        &self.custody
    }

    fn custody_mut(&mut self) -> &mut Custody {
        &mut self.custody
    }
}

fn by_item() -> KeyExtractor<Piece> {
    KeyExtractor::new("item", |p: &Piece| KeyValue::text(p.item.as_str()))
}

fn by_size() -> KeyExtractor<Piece> {
    KeyExtractor::new("size", |p: &Piece| KeyValue::text(p.size.as_str()))
}

/// Index grouped by (item, size, id), depth 3.
fn pieces() -> CompositeIndex<Piece> {
    CompositeIndex::new("pieces", vec![by_item(), by_size(), KeyExtractor::id()])
}

fn id(n: i64) -> RecordId {
    RecordId::int("piece", n)
}

// =============================================================================
// Round-trip and Idempotence
// =============================================================================

/// Removing a record restores n_items and membership, and returns the
/// record that was added.
#[test]
fn test_round_trip_restores_state() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    assert_eq!(index.n_items(), 1);

    index.add(Piece::new(2, "X", "S2")).unwrap();
    assert_eq!(index.n_items(), 2);
    assert!(index.contains_id(&id(2)));

    let removed = index.remove(&id(2)).unwrap();
    assert_eq!(removed.id(), &id(2));
    assert_eq!(removed.item, "X");
    assert!(!removed.custody().is_held());

    assert_eq!(index.n_items(), 1);
    assert!(!index.contains_id(&id(2)));
}

/// Adding the same id twice leaves n_items unchanged and does not fail.
#[test]
fn test_duplicate_add_is_noop() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    // Even with different attributes: the id decides.
    index.add(Piece::new(1, "Y", "S9")).unwrap();
    assert_eq!(index.n_items(), 1);
    let view = index.get(&id(1)).unwrap();
    assert_eq!(view.item, "X");
}

/// Removing an absent id fails with NotFound and changes nothing.
#[test]
fn test_remove_absent_id() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    let err = index.remove(&id(99)).unwrap_err();
    assert_eq!(err.code(), "PLAN_NOT_FOUND");
    assert_eq!(index.n_items(), 1);
}

// =============================================================================
// Property Gating
// =============================================================================

/// A record violating a bound constraint is always rejected and the index
/// is left unchanged.
#[test]
fn test_bound_property_gating() {
    use dyeplan::index::BoundPair;

    let mut index = CompositeIndex::with_bound(
        "pieces_for_x",
        vec![by_size(), KeyExtractor::id()],
        vec![BoundPair::new(by_item(), KeyValue::text("X"))],
    );

    index.add(Piece::new(1, "X", "S1")).unwrap();

    let err = index.add(Piece::new(2, "Y", "S1")).unwrap_err();
    match err {
        IndexError::PropertyMismatch {
            attribute,
            expected,
            actual,
        } => {
            assert_eq!(attribute, "item");
            assert_eq!(expected, KeyValue::text("X"));
            assert_eq!(actual, KeyValue::text("Y"));
        }
        other => panic!("expected PropertyMismatch, got {}", other),
    }
    assert_eq!(index.n_items(), 1);
    assert!(!index.contains_id(&id(2)));
}

// =============================================================================
// Depth-tuple Lookup
// =============================================================================

/// Walking a depth-3 index holding A(X,S1,1), B(X,S1,2), C(X,S2,3).
#[test]
fn test_depth_tuple_lookup() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    index.add(Piece::new(2, "X", "S1")).unwrap();
    index.add(Piece::new(3, "X", "S2")).unwrap();

    // idx[X] is a depth-2 sub-tree with keys {S1, S2}.
    let x = index.get_path(&[KeyValue::text("X")]).unwrap();
    let x = x.as_group().unwrap();
    assert_eq!(x.depth(), 2);
    let sizes: Vec<String> = x.keys().map(|k| k.to_string()).collect();
    assert_eq!(sizes, vec!["S1", "S2"]);

    // idx[X, S1] contains ids {1, 2}.
    let s1 = index
        .get_path(&[KeyValue::text("X"), KeyValue::text("S1")])
        .unwrap();
    let s1 = s1.as_group().unwrap();
    assert_eq!(s1.n_items(), 2);
    assert!(s1.contains(&[KeyValue::Id(id(1))]));
    assert!(s1.contains(&[KeyValue::Id(id(2))]));

    // idx[X, S1, 1] resolves to record A.
    let a = index
        .get_path(&[KeyValue::text("X"), KeyValue::text("S1"), KeyValue::Id(id(1))])
        .unwrap();
    let a = a.as_record().unwrap();
    assert_eq!(a.id(), &id(1));
    assert_eq!(a.size, "S1");
}

/// A path of depth 4 on a depth-3 index is a dimension mismatch reporting
/// both depths.
#[test]
fn test_dimension_mismatch() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();

    let err = index
        .get_path(&[
            KeyValue::text("X"),
            KeyValue::text("S1"),
            KeyValue::Id(id(1)),
            KeyValue::Int(2),
        ])
        .unwrap_err();
    assert_eq!(err.code(), "PLAN_DIMENSION_MISMATCH");
    assert!(matches!(
        err,
        IndexError::DimensionMismatch {
            given: 4,
            expected: 3
        }
    ));
}

/// A dead top-level key is NotFound, and the diagnostic names the pair
/// that failed.
#[test]
fn test_not_found_names_path() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();

    let err = index.get_path(&[KeyValue::text("Y")]).unwrap_err();
    assert_eq!(err.code(), "PLAN_NOT_FOUND");
    assert!(err.to_string().contains("item=Y"));

    // Dead inner key: the diagnostic lists every pair tried on the way.
    let err = index
        .get_path(&[KeyValue::text("X"), KeyValue::text("S9")])
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("item=X"));
    assert!(msg.contains("size=S9"));
}

/// The empty path views the index itself.
#[test]
fn test_empty_path_views_root() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    index.add(Piece::new(2, "Y", "S1")).unwrap();

    let root = index.get_path(&[]).unwrap();
    let root = root.as_group().unwrap();
    assert_eq!(root.depth(), 3);
    assert_eq!(root.n_items(), 2);
    assert_eq!(root.len(), 2);
}

// =============================================================================
// Pruning
// =============================================================================

/// A group key whose last record is removed disappears from length,
/// iteration and containment.
#[test]
fn test_emptied_children_are_pruned() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    index.add(Piece::new(2, "Y", "S1")).unwrap();
    assert_eq!(index.len(), 2);

    index.remove(&id(2)).unwrap();
    assert_eq!(index.len(), 1);
    assert!(!index.contains(&[KeyValue::text("Y")]));
    let keys: Vec<String> = index.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["X"]);

    // The key comes back on a fresh add.
    index.add(Piece::new(3, "Y", "S2")).unwrap();
    assert!(index.contains(&[KeyValue::text("Y")]));
    assert_eq!(index.len(), 2);
}

/// len counts live top-level keys, not records.
#[test]
fn test_len_counts_keys_not_records() {
    let mut index = pieces();
    index.add(Piece::new(1, "X", "S1")).unwrap();
    index.add(Piece::new(2, "X", "S2")).unwrap();
    index.add(Piece::new(3, "X", "S3")).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.n_items(), 3);
}
