//! Pure computation engine for the capital ledger.
//!
//! Nothing here performs I/O or reads the clock except [`LedgerEngine::append`], which stamps
//! new records with the current time.

use crate::domain::NotFinite;
use thiserror::Error;

pub mod anchor;
pub mod ledger;
pub mod rules;
pub mod summary;

pub use anchor::CapitalAnchor;
pub use ledger::LedgerEngine;
pub use rules::{LedgerRules, Outcome, ResultRule, ZeroResultPolicy};
pub use summary::Summary;

/// Errors raised by ledger operations. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range numeric input, or an operation attempted before the base
    /// capital was set.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Index {index} out of range for ledger of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<NotFinite> for LedgerError {
    fn from(err: NotFinite) -> Self {
        LedgerError::InvalidInput(err.to_string())
    }
}
