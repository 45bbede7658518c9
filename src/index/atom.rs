//! Atom: terminal zero-or-one record holder
//!
//! The leaf of the index recursion, reached once every grouping dimension
//! (including the id) has been resolved. An atom owns at most one record
//! and carries the frozen constraints inherited from its ancestors; any
//! record placed into it must satisfy all of them.

use crate::record::{Record, RecordId};

use super::errors::{IndexError, IndexResult};
use super::key::BoundPair;
use super::view::RecordView;

/// Depth-0 leaf holding 0 or 1 record under frozen constraints.
#[derive(Debug)]
pub struct Atom<R: Record> {
    bound: Vec<BoundPair<R>>,
    slot: Option<R>,
}

impl<R: Record> Atom<R> {
    /// Create an empty atom frozen to the given constraints.
    ///
    /// The constraints include the id-level pair, so every atom admits
    /// exactly one identity.
    pub fn new(bound: Vec<BoundPair<R>>) -> Self {
        Self { bound, slot: None }
    }

    /// Number of records held: 0 or 1
    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    /// True if no record is held
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// The frozen constraints, ancestor order
    pub fn bound(&self) -> &[BoundPair<R>] {
        &self.bound
    }

    /// Borrow the held record, if any
    pub fn record(&self) -> Option<&R> {
        self.slot.as_ref()
    }

    /// Mutably borrow the held record, if any. Callers go through
    /// custody-checked setters; the atom itself never rewrites attributes.
    pub(super) fn record_mut(&mut self) -> Option<&mut R> {
        self.slot.as_mut()
    }

    /// Place a record into the atom, taking custody.
    ///
    /// No-op if the atom already holds a record. Rejects, before any
    /// mutation, a record whose attributes disagree with the frozen
    /// constraints.
    pub fn add(&mut self, mut record: R) -> IndexResult<()> {
        if self.slot.is_some() {
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
        record.custody_mut().acquire();
        self.slot = Some(record);
        Ok(())
    }

    /// Release and return the held record.
    ///
    /// Fails if the atom is empty or holds a different id.
    pub fn remove(&mut self, id: &RecordId) -> IndexResult<R> {
        match self.slot.take() {
            Some(mut record) if record.id() == id => {
                record.custody_mut().release();
                Ok(record)
            }
            other => {
                self.slot = other;
                Err(IndexError::id_not_found(id.clone()))
            }
        }
    }

    /// Read-only view of the held record
    pub fn get(&self, id: &RecordId) -> IndexResult<RecordView<'_, R>> {
        match &self.slot {
            Some(record) if record.id() == id => Ok(RecordView::new(record)),
            _ => Err(IndexError::id_not_found(id.clone())),
        }
    }
}
