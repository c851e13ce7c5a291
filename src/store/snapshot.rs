//! Ledger snapshot persisted under two independent keys.
//!
//! - [`CAPITAL_BASE_KEY`]: the base capital as canonical decimal text.
//! - [`OPERATIONS_KEY`]: the ordered records as a JSON array, every decimal as exact text.
//!
//! Loading is forgiving: a missing or unreadable value is logged and treated as absent.

use super::{KeyValueStore, StoreError};
use crate::domain::{Decimal, OperationRecord};
use crate::engine::{CapitalAnchor, LedgerEngine, LedgerRules};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const CAPITAL_BASE_KEY: &str = "capital_base";
pub const OPERATIONS_KEY: &str = "operations";

/// Stored form of an [`OperationRecord`].
///
/// Decimals are written as strings so reloading replays the exact inputs.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    timestamp: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::str")]
    operated_value: RustDecimal,
    #[serde(with = "rust_decimal::serde::str")]
    percentage: RustDecimal,
    #[serde(with = "rust_decimal::serde::str")]
    opening_capital: RustDecimal,
    #[serde(with = "rust_decimal::serde::str")]
    result: RustDecimal,
    #[serde(with = "rust_decimal::serde::str")]
    closing_balance: RustDecimal,
    #[serde(with = "rust_decimal::serde::str")]
    risk_percent: RustDecimal,
}

impl From<&OperationRecord> for StoredRecord {
    fn from(record: &OperationRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            operated_value: record.operated_value.inner(),
            percentage: record.percentage.inner(),
            opening_capital: record.opening_capital.inner(),
            result: record.result.inner(),
            closing_balance: record.closing_balance.inner(),
            risk_percent: record.risk_percent.inner(),
        }
    }
}

impl From<StoredRecord> for OperationRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            timestamp: stored.timestamp,
            operated_value: stored.operated_value.into(),
            percentage: stored.percentage.into(),
            opening_capital: stored.opening_capital.into(),
            result: stored.result.into(),
            closing_balance: stored.closing_balance.into(),
            risk_percent: stored.risk_percent.into(),
        }
    }
}

/// The decoded contents of the store, before any re-derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub base_capital: Option<Decimal>,
    pub records: Vec<OperationRecord>,
}

impl LedgerSnapshot {
    /// Build an engine from this snapshot.
    ///
    /// Derived fields are recomputed from the stored inputs. If the stored records cannot be
    /// replayed the anchor is kept and the ledger starts empty.
    pub fn into_engine(self, rules: LedgerRules) -> LedgerEngine {
        let entries = self.records.iter().map(|r| (r.input(), r.timestamp));
        match LedgerEngine::restore(rules, self.base_capital, entries) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "Stored operations could not be replayed, starting empty");
                LedgerEngine::restore(rules, self.base_capital, std::iter::empty())
                    .unwrap_or_else(|_| LedgerEngine::new(rules))
            }
        }
    }
}

/// Read both keys from `store`.
///
/// # Errors
/// Returns an error only if the store itself fails. Bad content is not an error.
pub async fn load_snapshot(store: &dyn KeyValueStore) -> Result<LedgerSnapshot, StoreError> {
    let base_capital = store
        .get(CAPITAL_BASE_KEY)
        .await?
        .and_then(|bytes| decode_base_capital(&bytes));

    let records = match store.get(OPERATIONS_KEY).await? {
        Some(bytes) => decode_records(&bytes),
        None => Vec::new(),
    };

    if base_capital.is_none() && !records.is_empty() {
        warn!(
            count = records.len(),
            "Stored operations have no base capital, discarding"
        );
        return Ok(LedgerSnapshot::default());
    }

    debug!(
        has_base_capital = base_capital.is_some(),
        count = records.len(),
        "Loaded ledger snapshot"
    );
    Ok(LedgerSnapshot {
        base_capital,
        records,
    })
}

/// Write the engine's anchor and records to `store`.
///
/// An unset anchor deletes [`CAPITAL_BASE_KEY`]; the record list is always written.
pub async fn persist_snapshot(
    store: &dyn KeyValueStore,
    engine: &LedgerEngine,
) -> Result<(), StoreError> {
    match engine.base_capital() {
        Some(base) => {
            store
                .put(CAPITAL_BASE_KEY, base.to_canonical_string().into_bytes())
                .await?
        }
        None => store.delete(CAPITAL_BASE_KEY).await?,
    }

    store
        .put(OPERATIONS_KEY, encode_records(engine.records())?)
        .await?;

    debug!(count = engine.len(), "Persisted ledger snapshot");
    Ok(())
}

fn decode_base_capital(bytes: &[u8]) -> Option<Decimal> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Stored base capital is not UTF-8, ignoring");
            return None;
        }
    };
    let value = match Decimal::parse_finite(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Stored base capital is malformed, ignoring");
            return None;
        }
    };
    match CapitalAnchor::validate(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Stored base capital is out of range, ignoring");
            None
        }
    }
}

fn encode_records(records: &[OperationRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let stored: Vec<StoredRecord> = records.iter().map(StoredRecord::from).collect();
    serde_json::to_vec(&stored)
}

fn decode_records(bytes: &[u8]) -> Vec<OperationRecord> {
    match serde_json::from_slice::<Vec<StoredRecord>>(bytes) {
        Ok(stored) => stored.into_iter().map(OperationRecord::from).collect(),
        Err(e) => {
            warn!(error = %e, "Stored operations are malformed, starting with an empty ledger");
            Vec::new()
        }
    }
}
