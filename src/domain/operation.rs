//! Operation inputs and the derived ledger record.

use crate::domain::decimal::NotFinite;
use crate::domain::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The raw values a trader enters for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInput {
    /// Monetary value put into the operation. Zero and negative values are allowed.
    pub operated_value: Decimal,
    /// Percentage return of the operation, e.g. `50` for +50%, `-20` for -20%.
    pub percentage: Decimal,
}

impl OperationInput {
    pub fn new(operated_value: Decimal, percentage: Decimal) -> Self {
        Self {
            operated_value,
            percentage,
        }
    }

    /// Parse both fields from form text.
    pub fn parse(operated_value: &str, percentage: &str) -> Result<Self, NotFinite> {
        Ok(Self {
            operated_value: Decimal::parse_finite(operated_value)?,
            percentage: Decimal::parse_finite(percentage)?,
        })
    }

    /// Build from floats, rejecting NaN and infinities.
    pub fn from_f64(operated_value: f64, percentage: f64) -> Result<Self, NotFinite> {
        Ok(Self {
            operated_value: Decimal::try_from_f64(operated_value)?,
            percentage: Decimal::try_from_f64(percentage)?,
        })
    }
}

/// One row of the ledger.
///
/// `operated_value`, `percentage` and `timestamp` are fixed when the record is created. The
/// remaining fields are derived from the inputs, the previous record's closing balance and the
/// base capital, and are rewritten whenever a predecessor is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub timestamp: DateTime<Utc>,
    pub operated_value: Decimal,
    pub percentage: Decimal,
    pub opening_capital: Decimal,
    pub result: Decimal,
    pub closing_balance: Decimal,
    pub risk_percent: Decimal,
}

impl OperationRecord {
    pub fn input(&self) -> OperationInput {
        OperationInput::new(self.operated_value, self.percentage)
    }

    /// Row colouring rule used by presentation layers: break-even rows render as gains.
    pub fn is_gain(&self) -> bool {
        !self.result.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let input = OperationInput::parse("100", "-20").unwrap();
        assert_eq!(input.operated_value, Decimal::from(100));
        assert_eq!(input.percentage, Decimal::from(-20));
    }

    #[test]
    fn test_parse_input_rejects_blank_percentage() {
        assert!(OperationInput::parse("100", "").is_err());
        assert!(OperationInput::parse("", "10").is_err());
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert!(OperationInput::from_f64(f64::NAN, 10.0).is_err());
        assert!(OperationInput::from_f64(100.0, f64::INFINITY).is_err());
        assert!(OperationInput::from_f64(100.0, -20.0).is_ok());
    }

    #[test]
    fn test_is_gain_includes_break_even() {
        let mut record = OperationRecord {
            timestamp: Utc::now(),
            operated_value: Decimal::from(100),
            percentage: Decimal::zero(),
            opening_capital: Decimal::from(1000),
            result: Decimal::zero(),
            closing_balance: Decimal::from(1000),
            risk_percent: Decimal::zero(),
        };
        assert!(record.is_gain());
        record.result = Decimal::from(-1);
        assert!(!record.is_gain());
    }
}
