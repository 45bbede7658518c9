//! # Domain Errors
//!
//! Business-rule failures of the mill record types. Index-level failures
//! (custody violations from checked setters included) pass through
//! transparently.

use thiserror::Error;

use crate::index::IndexError;
use crate::record::RecordId;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Business-rule and pass-through errors of the mill records
#[derive(Debug, Error)]
pub enum DomainError {
    // ==================
    // Roll Errors
    // ==================
    /// Allocation request larger than what is left on the roll
    #[error("roll {id} has {available_m}m free, cannot allocate {requested_m}m")]
    RollOverAllocated {
        /// The roll
        id: RecordId,
        /// Meters requested
        requested_m: f64,
        /// Meters still unallocated
        available_m: f64,
    },

    /// Release request larger than what is allocated
    #[error("roll {id} has only {allocated_m}m allocated, cannot release {requested_m}m")]
    RollReleaseExceedsAllocation {
        /// The roll
        id: RecordId,
        /// Meters requested back
        requested_m: f64,
        /// Meters currently allocated
        allocated_m: f64,
    },

    // ==================
    // Dye-lot Errors
    // ==================
    /// Assigning the roll would push the lot past its jet capacity
    #[error("lot {id} holds {load_kg}kg of {capacity_kg}kg, cannot take {add_kg}kg more")]
    LotCapacityExceeded {
        /// The lot
        id: RecordId,
        /// Jet capacity in kilograms
        capacity_kg: f64,
        /// Current load in kilograms
        load_kg: f64,
        /// Weight of the rejected assignment
        add_kg: f64,
    },

    /// The roll is already part of the lot
    #[error("lot {id} already carries roll {roll}")]
    RollAlreadyAssigned {
        /// The lot
        id: RecordId,
        /// The duplicate roll
        roll: RecordId,
    },

    // ==================
    // Index Pass-through
    // ==================
    /// An index-level failure, custody violations included
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl DomainError {
    /// True if the underlying failure must stop the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Index(err) if err.is_fatal())
    }
}
