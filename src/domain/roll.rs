//! Greige rolls
//!
//! A roll of undyed fabric sitting in inventory. Rolls are allocated to
//! dye-lots a few meters at a time, so the kind opts into mutation while
//! grouped: allocation bookkeeping changes while the roll stays in the
//! inventory index. Grouping attributes (style, width) have no setters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::{KeyExtractor, KeyValue};
use crate::record::{Custody, Record, RecordId};

use super::errors::{DomainError, DomainResult};

/// A roll of greige fabric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreigeRoll {
    id: RecordId,
    style: String,
    width_cm: u32,
    meters: f64,
    allocated_m: f64,
    received: NaiveDate,
    custody: Custody,
}

impl GreigeRoll {
    /// Kind prefix stamped onto roll ids
    pub const PREFIX: &'static str = "roll";

    /// Create a roll as the inventory loader hands it over
    pub fn new(
        id: RecordId,
        style: impl Into<String>,
        width_cm: u32,
        meters: f64,
        received: NaiveDate,
    ) -> Self {
        Self {
            id,
            style: style.into(),
            width_cm,
            meters,
            allocated_m: 0.0,
            received,
            custody: Custody::free(),
        }
    }

    /// Fabric style code
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Roll width in centimeters
    pub fn width_cm(&self) -> u32 {
        self.width_cm
    }

    /// Total length in meters
    pub fn meters(&self) -> f64 {
        self.meters
    }

    /// Meters already promised to dye-lots
    pub fn allocated_m(&self) -> f64 {
        self.allocated_m
    }

    /// Meters still free
    pub fn available_m(&self) -> f64 {
        self.meters - self.allocated_m
    }

    /// Date the roll arrived from the loom shed
    pub fn received(&self) -> NaiveDate {
        self.received
    }

    /// Promise meters of this roll to a dye-lot.
    ///
    /// Allowed while the roll is grouped; fails if the roll does not have
    /// that much left.
    pub fn allocate(&mut self, requested_m: f64) -> DomainResult<()> {
        self.guard_mutation()?;
        if requested_m > self.available_m() {
            return Err(DomainError::RollOverAllocated {
                id: self.id.clone(),
                requested_m,
                available_m: self.available_m(),
            });
        }
        self.allocated_m += requested_m;
        Ok(())
    }

    /// Give promised meters back (a lot was torn up or re-planned)
    pub fn release(&mut self, requested_m: f64) -> DomainResult<()> {
        self.guard_mutation()?;
        if requested_m > self.allocated_m {
            return Err(DomainError::RollReleaseExceedsAllocation {
                id: self.id.clone(),
                requested_m,
                allocated_m: self.allocated_m,
            });
        }
        self.allocated_m -= requested_m;
        Ok(())
    }

    /// Grouping dimension: style code
    pub fn by_style() -> KeyExtractor<GreigeRoll> {
        KeyExtractor::new("style", |roll: &GreigeRoll| KeyValue::text(roll.style.as_str()))
    }

    /// Grouping dimension: width in centimeters
    pub fn by_width() -> KeyExtractor<GreigeRoll> {
        KeyExtractor::new("width", |roll: &GreigeRoll| KeyValue::from(roll.width_cm))
    }
}

impl Record for GreigeRoll {
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
