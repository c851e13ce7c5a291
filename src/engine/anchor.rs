use super::LedgerError;
use crate::domain::Decimal;

/// Holds the base capital every risk percentage is measured against.
///
/// The anchor itself knows nothing about records. [`super::LedgerEngine`] owns one and clears its
/// records whenever the anchor is set or cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapitalAnchor {
    base_capital: Option<Decimal>,
}

impl CapitalAnchor {
    pub fn new() -> Self {
        Self { base_capital: None }
    }

    /// Check that `value` can serve as base capital.
    ///
    /// The value must be strictly positive, and the summary targets derived from it must be
    /// representable.
    pub fn validate(value: Decimal) -> Result<Decimal, LedgerError> {
        if !value.is_positive() {
            return Err(LedgerError::InvalidInput(format!(
                "base capital must be positive, got {}",
                value
            )));
        }
        value
            .checked_mul(super::summary::target_20_factor())
            .ok_or_else(|| {
                LedgerError::InvalidInput(format!("base capital {} is out of range", value))
            })?;
        Ok(value)
    }

    pub fn set(&mut self, value: Decimal) -> Result<(), LedgerError> {
        self.base_capital = Some(Self::validate(value)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.base_capital = None;
    }

    pub fn get(&self) -> Option<Decimal> {
        self.base_capital
    }

    pub fn is_set(&self) -> bool {
        self.base_capital.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal as RustDecimal;

    #[test]
    fn test_set_and_get() {
        let mut anchor = CapitalAnchor::new();
        assert_eq!(anchor.get(), None);
        anchor.set(Decimal::from(1000)).unwrap();
        assert_eq!(anchor.get(), Some(Decimal::from(1000)));
        assert!(anchor.is_set());
    }

    #[test]
    fn test_rejects_non_positive() {
        let mut anchor = CapitalAnchor::new();
        assert!(matches!(
            anchor.set(Decimal::zero()),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            anchor.set(Decimal::from(-5)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(anchor.get(), None);
    }

    #[test]
    fn test_rejects_value_whose_targets_overflow() {
        let mut anchor = CapitalAnchor::new();
        anchor.set(Decimal::from(500)).unwrap();
        let result = anchor.set(Decimal::new(RustDecimal::MAX));
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        assert_eq!(anchor.get(), Some(Decimal::from(500)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut anchor = CapitalAnchor::new();
        anchor.clear();
        anchor.set(Decimal::from(1)).unwrap();
        anchor.clear();
        anchor.clear();
        assert!(!anchor.is_set());
    }
}
