//! Domain types for the capital ledger.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Operation inputs and derived ledger records

pub mod decimal;
pub mod operation;

pub use decimal::{Decimal, NotFinite};
pub use operation::{OperationInput, OperationRecord};
