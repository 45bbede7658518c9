//! Open-addressing hash table used at every level of the composite index
//!
//! # Invariants
//!
//! - Capacity is a power of two and grows only by doubling
//! - Load factor stays below 0.8 after every insert
//! - Iteration order is ascending insertion sequence, never slot order
//! - Probing stops on full key equality, never on hash equality alone
//! - Slot placement is deterministic across runs (fixed-key hasher)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::observability::Logger;

use super::errors::{IndexError, IndexResult};

/// Probe stride. Odd, so it is coprime with every power-of-two capacity and
/// a probe sequence visits all slots before cycling.
const STRIDE: usize = 7;

/// Smallest capacity a table is ever given
const MIN_CAPACITY: usize = 8;

/// One cell of the table.
#[derive(Debug)]
enum Slot<K, V> {
    /// Never used; terminates every probe sequence
    Vacant,
    /// Previously occupied; lookups skip it, inserts may reuse it
    Tombstone,
    /// Live entry with its global insertion sequence number
    Occupied { key: K, value: V, seq: u64 },
}

/// Open-addressing table mapping grouping keys to child nodes or records.
///
/// `remove` leaves a tombstone so later probe sequences still find entries
/// placed behind the removed one; tombstones are reclaimed on insert and
/// discarded on resize.
#[derive(Debug)]
pub struct HashBucket<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    next_seq: u64,
}

impl<K: Hash + Eq, V> HashBucket<K, V> {
    /// Create a table with the default initial capacity
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Create a table with at least the given capacity, rounded up to a
    /// power of two
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY).next_power_of_two();
        Self {
            slots: (0..capacity).map(|_| Slot::Vacant).collect(),
            len: 0,
            next_seq: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the table holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn hash_key(key: &K) -> u64 {
        // DefaultHasher::new() uses fixed keys, so placement is the same
        // on every run.
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Find the slot holding `key`, if any.
    ///
    /// Probes from `hash % capacity` with stride [`STRIDE`]; a vacant slot
    /// or a full cycle of `capacity` probes ends the search. Tombstones are
    /// skipped: the entry may have been placed behind one.
    fn locate(&self, key: &K) -> Option<usize> {
        let capacity = self.capacity();
        let mut index = (Self::hash_key(key) as usize) % capacity;
        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Vacant => return None,
                Slot::Tombstone => {}
                Slot::Occupied { key: held, .. } => {
                    // Full key equality, not hash equality: colliding
                    // values must stay distinct children.
                    if held == key {
                        return Some(index);
                    }
                }
            }
            index = (index + STRIDE) % capacity;
        }
        None
    }

    /// Find the first reusable slot (vacant or tombstone) for a key known
    /// to be absent. `None` after a full probe cycle means the table has no
    /// usable slot, which the caller treats as an invariant breach.
    fn insertion_slot(&self, key: &K) -> Option<usize> {
        let capacity = self.capacity();
        let mut index = (Self::hash_key(key) as usize) % capacity;
        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Vacant | Slot::Tombstone => return Some(index),
                Slot::Occupied { .. } => {}
            }
            index = (index + STRIDE) % capacity;
        }
        None
    }

    /// Insert or overwrite. Returns the previous value when the key was
    /// already present; an overwrite keeps the entry's insertion sequence.
    pub fn insert(&mut self, key: K, value: V) -> IndexResult<Option<V>> {
        if let Some(index) = self.locate(&key) {
            if let Slot::Occupied { value: held, .. } = &mut self.slots[index] {
                return Ok(Some(std::mem::replace(held, value)));
            }
        }

        if (self.len + 1) * 5 >= self.capacity() * 4 {
            self.grow()?;
        }

        let index = match self.insertion_slot(&key) {
            Some(index) => index,
            None => return Err(self.breach("no usable slot below the load-factor ceiling")),
        };
        self.slots[index] = Slot::Occupied {
            key,
            value,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.len += 1;
        Ok(None)
    }

    /// Borrow the value for a key
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.locate(key)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Mutably borrow the value for a key
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.locate(key)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True if the key has a live entry
    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Remove a key, leaving a tombstone in its slot
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.locate(key)?;
        match std::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.len -= 1;
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Double the capacity and re-place every live entry.
    ///
    /// Slots are recomputed in the grown table (tombstones are not carried
    /// over); each entry keeps its original insertion sequence, so iteration
    /// order survives the resize.
    fn grow(&mut self) -> IndexResult<()> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let from = old_capacity.to_string();
        let to = new_capacity.to_string();
        Logger::trace("INDEX_RESIZE", &[("from", from.as_str()), ("to", to.as_str())]);

        let old_slots = std::mem::replace(
            &mut self.slots,
            (0..new_capacity).map(|_| Slot::Vacant).collect(),
        );
        for slot in old_slots {
            if let Slot::Occupied { key, value, seq } = slot {
                let index = match self.insertion_slot(&key) {
                    Some(index) => index,
                    None => {
                        return Err(self.breach("resize could not re-place an occupied slot"))
                    }
                };
                self.slots[index] = Slot::Occupied { key, value, seq };
            }
        }
        Ok(())
    }

    /// Iterate live entries in insertion order (stable FIFO), never in
    /// physical slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let mut entries: Vec<(u64, &K, &V)> = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied { key, value, seq } => Some((*seq, key, value)),
                _ => None,
            })
            .collect();
        entries.sort_by_key(|(seq, _, _)| *seq);
        entries.into_iter().map(|(_, key, value)| (key, value))
    }

    /// Iterate live keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate live values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn breach(&self, what: &str) -> IndexError {
        let capacity = self.capacity().to_string();
        let len = self.len.to_string();
        Logger::fatal(
            "INDEX_INVARIANT_BREACH",
            &[
                ("detail", what),
                ("capacity", capacity.as_str()),
                ("len", len.as_str()),
            ],
        );
        IndexError::invariant_breach(what)
    }
}

impl<K: Hash + Eq, V> Default for HashBucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: i64) -> HashBucket<i64, String> {
        let mut bucket = HashBucket::new();
        for i in 0..n {
            bucket.insert(i, format!("v{}", i)).unwrap();
        }
        bucket
    }

    #[test]
    fn test_insert_get_remove() {
        let mut bucket = HashBucket::new();
        assert_eq!(bucket.insert("style", 1).unwrap(), None);
        assert_eq!(bucket.get(&"style"), Some(&1));
        assert!(bucket.contains(&"style"));
        assert_eq!(bucket.remove(&"style"), Some(1));
        assert_eq!(bucket.get(&"style"), None);
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_overwrite_returns_old_and_keeps_order() {
        let mut bucket = HashBucket::new();
        bucket.insert("a", 1).unwrap();
        bucket.insert("b", 2).unwrap();
        assert_eq!(bucket.insert("a", 10).unwrap(), Some(1));
        let keys: Vec<&&str> = bucket.keys().collect();
        assert_eq!(keys, vec![&"a", &"b"]);
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn test_load_factor_stays_below_ceiling() {
        let mut bucket = HashBucket::with_capacity(8);
        for i in 0..100 {
            bucket.insert(i, i).unwrap();
            assert!((bucket.len() as f64) / (bucket.capacity() as f64) < 0.8);
        }
    }

    #[test]
    fn test_capacity_doubles() {
        let mut bucket = HashBucket::with_capacity(8);
        assert_eq!(bucket.capacity(), 8);
        for i in 0..7 {
            bucket.insert(i, i).unwrap();
        }
        // 7th insert would reach 0.875 on capacity 8, so the table doubled.
        assert_eq!(bucket.capacity(), 16);
    }

    #[test]
    fn test_iteration_is_fifo_across_resizes() {
        let bucket = filled(50);
        let keys: Vec<i64> = bucket.keys().copied().collect();
        assert_eq!(keys, (0..50).collect::<Vec<i64>>());
    }

    #[test]
    fn test_membership_independent_of_initial_capacity() {
        let small = filled(64);
        let mut large: HashBucket<i64, String> = HashBucket::with_capacity(256);
        for i in 0..64 {
            large.insert(i, format!("v{}", i)).unwrap();
        }
        for i in 0..64 {
            assert_eq!(small.get(&i), large.get(&i));
        }
        assert_eq!(small.len(), large.len());
    }

    #[test]
    fn test_tombstone_does_not_break_probe_chain() {
        // Fill enough that probe chains overlap, then punch holes and check
        // every survivor is still reachable.
        let mut bucket = filled(40);
        for i in (0..40).step_by(3) {
            assert!(bucket.remove(&i).is_some());
        }
        for i in 0..40 {
            if i % 3 == 0 {
                assert_eq!(bucket.get(&i), None);
            } else {
                assert_eq!(bucket.get(&i), Some(&format!("v{}", i)));
            }
        }
    }

    #[test]
    fn test_tombstone_slot_is_reused() {
        let mut bucket = filled(5);
        let capacity = bucket.capacity();
        bucket.remove(&2);
        bucket.insert(2, "again".to_string()).unwrap();
        assert_eq!(bucket.capacity(), capacity);
        assert_eq!(bucket.get(&2), Some(&"again".to_string()));
        // Re-insert gets a fresh sequence number: 2 now iterates last.
        let keys: Vec<i64> = bucket.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 3, 4, 2]);
    }

    #[test]
    fn test_missing_key_lookup_terminates() {
        let bucket = filled(6);
        assert_eq!(bucket.get(&999), None);
        assert!(!bucket.contains(&999));
    }
}
