//! Order lines
//!
//! One line of an open customer order: so many meters of an item, in one
//! width and one shade, due by a date. Order lines never change while they
//! sit in a requirements index; amending one means removing it, editing it,
//! and adding it back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::{KeyExtractor, KeyValue};
use crate::record::{Custody, Record, RecordId};

use super::errors::DomainResult;

/// One open order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    id: RecordId,
    item: String,
    width_cm: u32,
    shade: String,
    meters: f64,
    due: NaiveDate,
    custody: Custody,
}

impl OrderLine {
    /// Kind prefix stamped onto order ids
    pub const PREFIX: &'static str = "order";

    /// Create an order line as the order-book loader hands it over
    pub fn new(
        id: RecordId,
        item: impl Into<String>,
        width_cm: u32,
        shade: impl Into<String>,
        meters: f64,
        due: NaiveDate,
    ) -> Self {
        Self {
            id,
            item: item.into(),
            width_cm,
            shade: shade.into(),
            meters,
            due,
            custody: Custody::free(),
        }
    }

    /// Item (style) code ordered
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Width in centimeters
    pub fn width_cm(&self) -> u32 {
        self.width_cm
    }

    /// Target shade code
    pub fn shade(&self) -> &str {
        &self.shade
    }

    /// Open meters on the line
    pub fn meters(&self) -> f64 {
        self.meters
    }

    /// Delivery date
    pub fn due(&self) -> NaiveDate {
        self.due
    }

    /// Amend the open quantity.
    ///
    /// Rejected with CustodyViolation while the line is held by an index:
    /// remove it first, amend, add it back.
    pub fn set_meters(&mut self, meters: f64) -> DomainResult<()> {
        self.guard_mutation()?;
        self.meters = meters;
        Ok(())
    }

    /// Amend the delivery date. Custody-checked like [`Self::set_meters`].
    pub fn set_due(&mut self, due: NaiveDate) -> DomainResult<()> {
        self.guard_mutation()?;
        self.due = due;
        Ok(())
    }

    /// Grouping dimension: item code
    pub fn by_item() -> KeyExtractor<OrderLine> {
        KeyExtractor::new("item", |line: &OrderLine| KeyValue::text(line.item.as_str()))
    }

    /// Grouping dimension: width in centimeters
    pub fn by_width() -> KeyExtractor<OrderLine> {
        KeyExtractor::new("width", |line: &OrderLine| KeyValue::from(line.width_cm))
    }

    /// Grouping dimension: shade code
    pub fn by_shade() -> KeyExtractor<OrderLine> {
        KeyExtractor::new("shade", |line: &OrderLine| KeyValue::text(line.shade.as_str()))
    }
}

impl Record for OrderLine {
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
