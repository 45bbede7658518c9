//! Record protocol for the planning model
//!
//! Every domain entity stored in a composite index implements [`Record`]:
//! a stable prefixed identity, custody state, and a compile-time switch
//! saying whether the kind may mutate payload attributes while grouped.
//!
//! # Design Principles
//!
//! - Explicit trait, not duck typing: the index names its requirements
//! - Custody is structural: records move into the tree on add, out on remove
//! - Mutability while grouped is a property of the kind, fixed at compile time
//! - Id generation is injectable and run-scoped, never global

mod custody;
mod ids;

pub use custody::Custody;
pub use ids::{IdGenerator, IdValue, RecordId};

use crate::index::{IndexError, IndexResult};

/// A domain entity with a stable identity, storable in a composite index.
///
/// Grouping attributes are reached through typed key extractors configured
/// on the index, not through this trait; the trait only carries what every
/// index level needs regardless of configuration.
pub trait Record {
    /// Whether payload attributes may change while the record is held by an
    /// index. Rolls being partially allocated opt in; order lines do not.
    const MUTABLE_WHILE_GROUPED: bool;

    /// Stable identity, immutable for the record's lifetime
    fn id(&self) -> &RecordId;

    /// Custody state
    fn custody(&self) -> &Custody;

    /// Custody state, for the atom that holds or releases the record
    fn custody_mut(&mut self) -> &mut Custody;

    /// Gate for checked setters: rejects mutation while held unless the
    /// kind opted into mutation while grouped.
    fn guard_mutation(&self) -> IndexResult<()> {
        if self.custody().is_held() && !Self::MUTABLE_WHILE_GROUPED {
            return Err(IndexError::custody_violation(self.id().clone()));
        }
        Ok(())
    }
}
