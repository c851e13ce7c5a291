//! Configurable ledger rules.
//!
//! Two points of the ledger arithmetic are policy rather than math: how a negative percentage
//! turns into a result, and how a break-even operation is counted in the summary. Both are named
//! choices here so callers pick one explicitly.

use crate::domain::{Decimal, OperationInput};
use serde::{Deserialize, Serialize};

/// How an operation's result is computed from its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultRule {
    /// `operated_value * (percentage / 100)` for every sign of percentage.
    #[default]
    Scaled,
    /// A negative percentage loses the whole operated value (`-|operated_value|`).
    /// Non-negative percentages are scaled as in [`ResultRule::Scaled`].
    FullValueOnLoss,
}

impl ResultRule {
    /// Compute the result of an operation. `None` on arithmetic overflow.
    pub fn result_for(&self, input: &OperationInput) -> Option<Decimal> {
        match self {
            ResultRule::FullValueOnLoss if input.percentage.is_negative() => {
                Some(-input.operated_value.abs())
            }
            ResultRule::Scaled | ResultRule::FullValueOnLoss => input
                .percentage
                .checked_div(Decimal::hundred())?
                .checked_mul(input.operated_value),
        }
    }
}

/// How a record whose result is exactly zero is counted by the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroResultPolicy {
    /// Counted as neither won nor lost.
    #[default]
    Neither,
    /// Counted as lost.
    Loss,
    /// Counted as won.
    Win,
}

/// Outcome of a single operation for summary counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Flat,
}

impl ZeroResultPolicy {
    pub fn classify(&self, result: Decimal) -> Outcome {
        if result.is_positive() {
            return Outcome::Won;
        }
        if result.is_negative() {
            return Outcome::Lost;
        }
        match self {
            ZeroResultPolicy::Neither => Outcome::Flat,
            ZeroResultPolicy::Loss => Outcome::Lost,
            ZeroResultPolicy::Win => Outcome::Won,
        }
    }
}

/// The full set of rule choices a ledger is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerRules {
    pub result_rule: ResultRule,
    pub zero_result: ZeroResultPolicy,
}

impl LedgerRules {
    pub fn new(result_rule: ResultRule, zero_result: ZeroResultPolicy) -> Self {
        Self {
            result_rule,
            zero_result,
        }
    }
}
