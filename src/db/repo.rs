//! SQLite-backed key/value repository.

use crate::store::{KeyValueStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

/// Repository over the `kv_store` table.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_value(&self, key: &str) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<Vec<u8>, _>("value")))
    }

    /// Insert or replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_value(&self, key: &str, value: &[u8]) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at_ms)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at_ms = excluded.updated_at_ms
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete the value stored under `key`. Returns whether a row was removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_value(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl KeyValueStore for Repository {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get_value(key).await?)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        Ok(self.upsert_value(key, &value).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.delete_value(key).await?;
        Ok(())
    }
}
