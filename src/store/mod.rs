//! Persistence collaborator: a key/value byte store plus the ledger snapshot format written to it.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{
    load_snapshot, persist_snapshot, LedgerSnapshot, CAPITAL_BASE_KEY, OPERATIONS_KEY,
};

/// Byte-string key/value store the ledger is persisted to.
#[async_trait]
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
