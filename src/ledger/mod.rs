//! Record stores for the two contracts and the pieces they share.

pub mod clock;
pub mod compression;
pub mod config;
pub mod entry;
pub mod idea_evolution;
pub mod memetic_resilience;
pub(crate) mod table;

use entry::{RecordId, RecordKind};
use thiserror::Error;

/// Numeric code carried by not-found errors.
pub const NOT_FOUND_CODE: u16 = 404;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
}

impl LedgerError {
    /// Code reported in an error envelope.
    pub fn code(&self) -> u16 {
        match self {
            LedgerError::NotFound { .. } => NOT_FOUND_CODE,
        }
    }
}
