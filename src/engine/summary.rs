use super::rules::{Outcome, ZeroResultPolicy};
use crate::domain::{Decimal, OperationRecord};
use serde::Serialize;

pub(crate) fn target_10_factor() -> Decimal {
    Decimal::from_parts(110, 2)
}

pub(crate) fn target_20_factor() -> Decimal {
    Decimal::from_parts(120, 2)
}

pub(crate) fn max_loss_factor() -> Decimal {
    Decimal::from_parts(95, 2)
}

/// Aggregate view of the ledger and the capital targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub base_capital: Decimal,
    pub won_count: usize,
    pub lost_count: usize,
    pub total_operations: usize,
    /// Closing balance of the last record, or the base capital when the ledger is empty.
    pub final_balance: Decimal,
    /// Sum of every record's result.
    pub total_result: Decimal,
    /// Base capital plus 10%.
    pub target_10: Decimal,
    /// Base capital plus 20%.
    pub target_20: Decimal,
    /// Base capital minus 5%.
    pub max_loss_floor: Decimal,
}

impl Summary {
    /// Aggregate `records` against `base_capital`.
    ///
    /// `base_capital` must already have passed [`super::CapitalAnchor::validate`], which
    /// guarantees the target multiplications stay in range.
    pub fn compute(
        base_capital: Decimal,
        records: &[OperationRecord],
        zero_result: ZeroResultPolicy,
    ) -> Self {
        let mut won_count = 0;
        let mut lost_count = 0;
        let mut total_result = Decimal::zero();

        for record in records {
            match zero_result.classify(record.result) {
                Outcome::Won => won_count += 1,
                Outcome::Lost => lost_count += 1,
                Outcome::Flat => {}
            }
            total_result = total_result.saturating_add(record.result);
        }

        let final_balance = records
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(base_capital);

        Self {
            base_capital,
            won_count,
            lost_count,
            total_operations: records.len(),
            final_balance,
            total_result,
            target_10: base_capital * target_10_factor(),
            target_20: base_capital * target_20_factor(),
            max_loss_floor: base_capital * max_loss_factor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(result: i64, closing: i64) -> OperationRecord {
        OperationRecord {
            timestamp: Utc::now(),
            operated_value: Decimal::from(100),
            percentage: Decimal::zero(),
            opening_capital: Decimal::from(closing - result),
            result: Decimal::from(result),
            closing_balance: Decimal::from(closing),
            risk_percent: Decimal::zero(),
        }
    }

    #[test]
    fn test_empty_ledger_targets() {
        let summary = Summary::compute(Decimal::from(5000), &[], ZeroResultPolicy::Neither);
        assert_eq!(summary.target_10, Decimal::from(5500));
        assert_eq!(summary.target_20, Decimal::from(6000));
        assert_eq!(summary.max_loss_floor, Decimal::from(4750));
        assert_eq!(summary.final_balance, Decimal::from(5000));
        assert_eq!(summary.total_result, Decimal::zero());
        assert_eq!(summary.won_count, 0);
        assert_eq!(summary.lost_count, 0);
        assert_eq!(summary.total_operations, 0);
    }

    #[test]
    fn test_counts_follow_zero_policy() {
        let records = vec![record(50, 1050), record(0, 1050), record(-20, 1030)];

        let neither = Summary::compute(Decimal::from(1000), &records, ZeroResultPolicy::Neither);
        assert_eq!((neither.won_count, neither.lost_count), (1, 1));

        let loss = Summary::compute(Decimal::from(1000), &records, ZeroResultPolicy::Loss);
        assert_eq!((loss.won_count, loss.lost_count), (1, 2));

        let win = Summary::compute(Decimal::from(1000), &records, ZeroResultPolicy::Win);
        assert_eq!((win.won_count, win.lost_count), (2, 1));

        assert_eq!(neither.total_operations, 3);
        assert_eq!(neither.final_balance, Decimal::from(1030));
        assert_eq!(neither.total_result, Decimal::from(30));
    }
}
