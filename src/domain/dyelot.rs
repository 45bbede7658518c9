//! Dye-lots
//!
//! A batch of rolls dyed together in one jet run. Lots are built up
//! incrementally while they sit on the lot board, so the kind opts into
//! mutation while grouped. The shade (a grouping attribute) is fixed at
//! creation: a lot is one shade by definition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::{KeyExtractor, KeyValue};
use crate::record::{Custody, Record, RecordId};

use super::errors::{DomainError, DomainResult};

/// A dye-lot being packed for one jet run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DyeLot {
    id: RecordId,
    shade: String,
    capacity_kg: f64,
    load_kg: f64,
    rolls: Vec<RecordId>,
    scheduled: Option<NaiveDate>,
    custody: Custody,
}

impl DyeLot {
    /// Kind prefix stamped onto lot ids
    pub const PREFIX: &'static str = "lot";

    /// Open an empty lot for a shade on a jet of the given capacity
    pub fn new(id: RecordId, shade: impl Into<String>, capacity_kg: f64) -> Self {
        Self {
            id,
            shade: shade.into(),
            capacity_kg,
            load_kg: 0.0,
            rolls: Vec::new(),
            scheduled: None,
            custody: Custody::free(),
        }
    }

    /// Shade the lot will be dyed
    pub fn shade(&self) -> &str {
        &self.shade
    }

    /// Jet capacity in kilograms
    pub fn capacity_kg(&self) -> f64 {
        self.capacity_kg
    }

    /// Fabric weight already packed
    pub fn load_kg(&self) -> f64 {
        self.load_kg
    }

    /// Kilograms still packable
    pub fn headroom_kg(&self) -> f64 {
        self.capacity_kg - self.load_kg
    }

    /// Rolls packed into the lot, assignment order
    pub fn rolls(&self) -> &[RecordId] {
        &self.rolls
    }

    /// Jet date, once the scheduler has placed the lot
    pub fn scheduled(&self) -> Option<NaiveDate> {
        self.scheduled
    }

    /// Pack a roll (or part of one) into the lot.
    ///
    /// Allowed while the lot is grouped. Fails if the weight does not fit
    /// or the roll is already in the lot.
    pub fn assign_roll(&mut self, roll: RecordId, weight_kg: f64) -> DomainResult<()> {
        self.guard_mutation()?;
        if self.rolls.contains(&roll) {
            return Err(DomainError::RollAlreadyAssigned {
                id: self.id.clone(),
                roll,
            });
        }
        if weight_kg > self.headroom_kg() {
            return Err(DomainError::LotCapacityExceeded {
                id: self.id.clone(),
                capacity_kg: self.capacity_kg,
                load_kg: self.load_kg,
                add_kg: weight_kg,
            });
        }
        self.rolls.push(roll);
        self.load_kg += weight_kg;
        Ok(())
    }

    /// Place the lot on a jet date
    pub fn schedule(&mut self, date: NaiveDate) -> DomainResult<()> {
        self.guard_mutation()?;
        self.scheduled = Some(date);
        Ok(())
    }

    /// Grouping dimension: shade code
    pub fn by_shade() -> KeyExtractor<DyeLot> {
        KeyExtractor::new("shade", |lot: &DyeLot| KeyValue::text(lot.shade.as_str()))
    }
}

impl Record for DyeLot {
    const MUTABLE_WHILE_GROUPED: bool = true;

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

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> DyeLot {
        DyeLot::new(RecordId::int(DyeLot::PREFIX, 7), "navy", 400.0)
    }

    #[test]
    fn test_pack_within_capacity() {
        let mut lot = lot();
        lot.assign_roll(RecordId::int("roll", 1), 180.0).unwrap();
        lot.assign_roll(RecordId::int("roll", 2), 180.0).unwrap();
        assert_eq!(lot.load_kg(), 360.0);
        assert_eq!(lot.headroom_kg(), 40.0);
        assert_eq!(lot.rolls().len(), 2);
    }

    #[test]
    fn test_capacity_exceeded_rejected() {
        let mut lot = lot();
        lot.assign_roll(RecordId::int("roll", 1), 390.0).unwrap();
        let err = lot.assign_roll(RecordId::int("roll", 2), 20.0).unwrap_err();
        assert!(matches!(err, DomainError::LotCapacityExceeded { .. }));
        assert_eq!(lot.rolls().len(), 1);
    }

    #[test]
    fn test_duplicate_roll_rejected() {
        let mut lot = lot();
        lot.assign_roll(RecordId::int("roll", 1), 50.0).unwrap();
        let err = lot.assign_roll(RecordId::int("roll", 1), 50.0).unwrap_err();
        assert!(matches!(err, DomainError::RollAlreadyAssigned { .. }));
        assert_eq!(lot.load_kg(), 50.0);
    }

    #[test]
    fn test_packing_allowed_while_grouped() {
        let mut lot = lot();
        lot.custody_mut().acquire();
        lot.assign_roll(RecordId::int("roll", 3), 10.0).unwrap();
        lot.schedule(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap())
            .unwrap();
        assert!(lot.scheduled().is_some());
    }
}
