use crate::domain::{Decimal, OperationInput};
use crate::engine::{LedgerEngine, LedgerError, LedgerRules, Summary};
use crate::store::{load_snapshot, persist_snapshot, KeyValueStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Owns the ledger engine and writes it to the store after every successful mutation.
///
/// Mutating methods take `&mut self`; to share a session between tasks wrap it in a
/// `tokio::sync::Mutex` so recomputation and persistence stay serialized.
#[derive(Debug)]
pub struct LedgerSession {
    engine: LedgerEngine,
    store: Arc<dyn KeyValueStore>,
}

impl LedgerSession {
    /// Load the persisted ledger from `store`, or start empty if nothing usable is stored.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        rules: LedgerRules,
    ) -> Result<Self, SessionError> {
        let engine = load_snapshot(store.as_ref()).await?.into_engine(rules);
        info!(
            base_capital = ?engine.base_capital(),
            operations = engine.len(),
            "Ledger session loaded"
        );
        Ok(Self { engine, store })
    }

    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    pub fn summary(&self) -> Option<Summary> {
        self.engine.summary()
    }

    /// Set the base capital, dropping any existing operations.
    pub async fn set_base_capital(&mut self, value: Decimal) -> Result<(), SessionError> {
        let dropped = self.engine.len();
        self.engine.set_base_capital(value)?;
        info!(base_capital = %value, dropped, "Base capital set");
        self.persist().await
    }

    /// Parse and set the base capital from form text.
    pub async fn set_base_capital_text(&mut self, value: &str) -> Result<(), SessionError> {
        let value = Decimal::parse_finite(value).map_err(LedgerError::from)?;
        self.set_base_capital(value).await
    }

    pub async fn clear_base_capital(&mut self) -> Result<(), SessionError> {
        self.engine.clear_base_capital();
        info!("Base capital cleared");
        self.persist().await
    }

    pub async fn append(&mut self, input: OperationInput) -> Result<(), SessionError> {
        self.engine.append(input)?;
        info!(
            operated_value = %input.operated_value,
            percentage = %input.percentage,
            operations = self.engine.len(),
            "Operation recorded"
        );
        self.persist().await
    }

    /// Parse and append an operation from form text.
    pub async fn append_text(
        &mut self,
        operated_value: &str,
        percentage: &str,
    ) -> Result<(), SessionError> {
        let input = OperationInput::parse(operated_value, percentage).map_err(LedgerError::from)?;
        self.append(input).await
    }

    pub async fn remove_at(&mut self, index: usize) -> Result<(), SessionError> {
        self.engine.remove_at(index)?;
        info!(
            index,
            remaining = self.engine.len(),
            "Operation removed, ledger recomputed"
        );
        self.persist().await
    }

    async fn persist(&self) -> Result<(), SessionError> {
        persist_snapshot(self.store.as_ref(), &self.engine).await?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, OPERATIONS_KEY};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    async fn session() -> (LedgerSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = LedgerSession::load(store.clone(), LedgerRules::default())
            .await
            .unwrap();
        (session, store)
    }

    #[tokio::test]
    async fn test_failed_append_does_not_persist() {
        let (mut session, store) = session().await;
        let err = session.append_text("100", "50").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Ledger(LedgerError::InvalidInput(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_append_text_rejects_garbage() {
        let (mut session, _store) = session().await;
        session.set_base_capital_text("1000").await.unwrap();
        assert!(session.append_text("abc", "10").await.is_err());
        assert!(session.append_text("100", "").await.is_err());
        assert!(session.engine().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let (mut session, store) = session().await;
        session.set_base_capital(d("1000")).await.unwrap();
        session.append_text("100", "50").await.unwrap();

        let reloaded = LedgerSession::load(store.clone(), LedgerRules::default())
            .await
            .unwrap();
        assert_eq!(reloaded.engine().records(), session.engine().records());

        session.remove_at(0).await.unwrap();
        assert_eq!(
            store.get(OPERATIONS_KEY).await.unwrap(),
            Some(b"[]".to_vec())
        );
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_reported() {
        let (mut session, _store) = session().await;
        session.set_base_capital(d("1000")).await.unwrap();
        let err = session.remove_at(0).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Ledger(LedgerError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }
}
