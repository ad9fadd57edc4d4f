//! Persistent backend on the SQLite `kv_store` table.

use async_trait::async_trait;
use tracing::instrument;

use super::backend::{BackendError, StorageBackend};
use crate::db::Database;

/// Backend writing to the `kv_store` table of a [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    #[instrument(skip(self), level = "trace")]
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(value)
    }

    #[instrument(skip(self, value), level = "trace", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        sqlx::query(
            r"INSERT INTO kv_store (key, value) VALUES (?, ?)
              ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "trace")]
    async fn remove(&self, key: &str) -> Result<(), BackendError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, BackendError> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(self.db.pool())
            .await?;
        Ok(keys)
    }
}
