//! Mill domain records and their index configurations
//!
//! The record kinds of the planning run and constructors for the composite
//! indices the rest of the model works against. Loaders construct records
//! (with run-scoped [`crate::record::IdGenerator`]s) and add them here;
//! scheduling and allocation read through views only.
//!
//! # Design Principles
//!
//! - Grouping attributes are immutable after construction on every kind
//! - Payload mutability while grouped is per kind: rolls and lots yes,
//!   order lines no
//! - Business-rule checks live on the records, not in the index

mod dyelot;
mod errors;
mod order;
mod roll;

pub use dyelot::DyeLot;
pub use errors::{DomainError, DomainResult};
pub use order::OrderLine;
pub use roll::GreigeRoll;

use crate::index::{BoundPair, CompositeIndex, KeyExtractor, KeyValue};

/// Inventory of greige rolls, grouped by style, width, id
pub fn inventory() -> CompositeIndex<GreigeRoll> {
    CompositeIndex::new(
        "inventory",
        vec![
            GreigeRoll::by_style(),
            GreigeRoll::by_width(),
            KeyExtractor::id(),
        ],
    )
}

/// Open order book, grouped by item, width, shade, id
pub fn demand() -> CompositeIndex<OrderLine> {
    CompositeIndex::new(
        "demand",
        vec![
            OrderLine::by_item(),
            OrderLine::by_width(),
            OrderLine::by_shade(),
            KeyExtractor::id(),
        ],
    )
}

/// Requirements for a single item: every member must carry that item code,
/// grouped by width, shade, id
pub fn requirements_for_item(item: &str) -> CompositeIndex<OrderLine> {
    CompositeIndex::with_bound(
        "requirements",
        vec![
            OrderLine::by_width(),
            OrderLine::by_shade(),
            KeyExtractor::id(),
        ],
        vec![BoundPair::new(OrderLine::by_item(), KeyValue::text(item))],
    )
}

/// The lot board: open dye-lots grouped by shade, id
pub fn lot_board() -> CompositeIndex<DyeLot> {
    CompositeIndex::new("lot_board", vec![DyeLot::by_shade(), KeyExtractor::id()])
}
