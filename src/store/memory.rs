//! In-memory store for tests and embedding without a database.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. to simulate state left behind by an earlier run.
    pub fn with_entry(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.entries
            .get_mut()
            .insert(key.to_string(), value.into());
        self
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            assert!(store.is_empty().await);

            store.put("capital_base", b"1000".to_vec()).await.unwrap();
            assert_eq!(
                store.get("capital_base").await.unwrap(),
                Some(b"1000".to_vec())
            );

            store.delete("capital_base").await.unwrap();
            store.delete("capital_base").await.unwrap();
            assert_eq!(store.get("capital_base").await.unwrap(), None);
        });
    }

    #[test]
    fn test_with_entry_seeds_value() {
        tokio_test::block_on(async {
            let store = MemoryStore::new().with_entry("operations", "[]");
            assert_eq!(store.len().await, 1);
            assert_eq!(store.get("operations").await.unwrap(), Some(b"[]".to_vec()));
        });
    }
}
