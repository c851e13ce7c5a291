use super::anchor::CapitalAnchor;
use super::rules::LedgerRules;
use super::summary::Summary;
use super::LedgerError;
use crate::domain::{Decimal, OperationInput, OperationRecord};
use chrono::{DateTime, Utc};

/// Owns the capital anchor and the ordered operation records.
///
/// Every mutating method either fails without touching state or returns with the chain
/// invariant restored: each record opens on the previous record's closing balance, and the first
/// record opens on the base capital.
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine {
    rules: LedgerRules,
    anchor: CapitalAnchor,
    records: Vec<OperationRecord>,
}

impl LedgerEngine {
    pub fn new(rules: LedgerRules) -> Self {
        Self {
            rules,
            anchor: CapitalAnchor::new(),
            records: Vec::new(),
        }
    }

    /// Rebuild an engine from persisted state.
    ///
    /// Derived fields are recomputed from the inputs; only the inputs and timestamps of
    /// `entries` are used. Entries are ignored when `base_capital` is absent.
    pub fn restore(
        rules: LedgerRules,
        base_capital: Option<Decimal>,
        entries: impl IntoIterator<Item = (OperationInput, DateTime<Utc>)>,
    ) -> Result<Self, LedgerError> {
        let mut engine = Self::new(rules);
        let Some(base_capital) = base_capital else {
            return Ok(engine);
        };
        engine.anchor.set(base_capital)?;
        for (input, timestamp) in entries {
            engine.append_at(input, timestamp)?;
        }
        Ok(engine)
    }

    pub fn rules(&self) -> LedgerRules {
        self.rules
    }

    pub fn anchor(&self) -> &CapitalAnchor {
        &self.anchor
    }

    pub fn base_capital(&self) -> Option<Decimal> {
        self.anchor.get()
    }

    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Set a new base capital. Any existing records are dropped, since their risk percentages
    /// were measured against the old value.
    pub fn set_base_capital(&mut self, value: Decimal) -> Result<(), LedgerError> {
        self.anchor.set(value)?;
        self.records.clear();
        Ok(())
    }

    /// Unset the base capital and drop every record.
    pub fn clear_base_capital(&mut self) {
        self.anchor.clear();
        self.records.clear();
    }

    /// Append an operation stamped with the current time.
    pub fn append(&mut self, input: OperationInput) -> Result<(), LedgerError> {
        self.append_at(input, Utc::now())
    }

    /// Append an operation with an explicit creation timestamp.
    pub fn append_at(
        &mut self,
        input: OperationInput,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let base = self.require_base()?;
        let opening = self
            .records
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(base);
        let record = derive(&self.rules, base, opening, input, timestamp)?;
        self.records.push(record);
        Ok(())
    }

    /// Remove the record at `index` and re-derive every record after it.
    ///
    /// Records before `index` keep their values. The tail is recomputed into a staging buffer
    /// first so a failure leaves the ledger unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<(), LedgerError> {
        let len = self.records.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        let base = self.require_base()?;

        let mut opening = match index {
            0 => base,
            _ => self.records[index - 1].closing_balance,
        };
        let mut rederived = Vec::with_capacity(len - index - 1);
        for record in &self.records[index + 1..] {
            let next = derive(&self.rules, base, opening, record.input(), record.timestamp)?;
            opening = next.closing_balance;
            rederived.push(next);
        }

        self.records.truncate(index);
        self.records.extend(rederived);
        Ok(())
    }

    /// Aggregate counts, balances and targets. `None` while no base capital is set.
    pub fn summary(&self) -> Option<Summary> {
        self.anchor
            .get()
            .map(|base| Summary::compute(base, &self.records, self.rules.zero_result))
    }

    fn require_base(&self) -> Result<Decimal, LedgerError> {
        self.anchor
            .get()
            .ok_or_else(|| LedgerError::InvalidInput("base capital is not set".to_string()))
    }
}

/// Compute one record from its inputs and the balance it opens on.
fn derive(
    rules: &LedgerRules,
    base: Decimal,
    opening_capital: Decimal,
    input: OperationInput,
    timestamp: DateTime<Utc>,
) -> Result<OperationRecord, LedgerError> {
    let overflow = || {
        LedgerError::InvalidInput(format!(
            "operation {} at {}% overflows the ledger",
            input.operated_value, input.percentage
        ))
    };

    let result = rules.result_rule.result_for(&input).ok_or_else(overflow)?;
    let closing_balance = opening_capital.checked_add(result).ok_or_else(overflow)?;
    let risk_percent = closing_balance
        .checked_sub(base)
        .and_then(|delta| delta.checked_div(base))
        .and_then(|ratio| ratio.checked_mul(Decimal::hundred()))
        .ok_or_else(overflow)?;

    Ok(OperationRecord {
        timestamp,
        operated_value: input.operated_value,
        percentage: input.percentage,
        opening_capital,
        result,
        closing_balance,
        risk_percent,
    })
}
