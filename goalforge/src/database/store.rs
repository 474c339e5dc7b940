//! Local key/value store
//!
//! Every piece of application state lives in a named slot holding JSON
//! text. Reads fall back to a caller-supplied default when the slot is
//! missing or unreadable; writes overwrite the whole slot. Last write wins.

use crate::error::Result;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

/// Handle to the key/value table. Cheap to clone.
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Raw JSON text stored under `key`
    pub async fn load_raw(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Decode the value under `key`. Unparseable text counts as absent.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.load_raw(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable value under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub async fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.load(key).await?.unwrap_or(default))
    }

    pub async fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.load(key).await?.unwrap_or_default())
    }

    /// Serialize `value` and overwrite the slot
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, revision, updated_at) VALUES (?, ?, 1, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                revision = kv_store.revision + 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved {} ({} bytes)", key, json.len());
        Ok(())
    }

    /// Delete a slot. Removing a missing key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows > 0 {
            tracing::debug!("Removed {}", key);
        }
        Ok(())
    }

    /// Number of writes the slot has seen, or None if it does not exist
    pub async fn revision(&self, key: &str) -> Result<Option<i64>> {
        let revision: Option<i64> =
            sqlx::query_scalar("SELECT revision FROM kv_store WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(revision)
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_pool;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
        #[serde(default)]
        label: String,
    }

    async fn create_test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
        (LocalStore::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_missing_key_uses_default() {
        let (store, _temp) = create_test_store().await;

        let value: Vec<String> = store.load_or_default("nothing-here").await.unwrap();
        assert!(value.is_empty());

        let value = store.load_or("nothing-here", vec![1, 2]).await.unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (store, _temp) = create_test_store().await;

        let counter = Counter {
            count: 3,
            label: "streak".to_string(),
        };
        store.save("counter", &counter).await.unwrap();

        let loaded: Option<Counter> = store.load("counter").await.unwrap();
        assert_eq!(loaded, Some(counter));
    }

    #[tokio::test]
    async fn test_unparseable_value_counts_as_absent() {
        let (store, _temp) = create_test_store().await;

        store.save("counter", "not a counter").await.unwrap();

        let loaded: Option<Counter> = store.load("counter").await.unwrap();
        assert_eq!(loaded, None);

        let fallback: Counter = store.load_or_default("counter").await.unwrap();
        assert_eq!(fallback, Counter::default());
    }

    #[tokio::test]
    async fn test_missing_fields_merge_with_defaults() {
        let (store, _temp) = create_test_store().await;

        store
            .save("counter", &serde_json::json!({ "count": 7 }))
            .await
            .unwrap();

        let loaded: Counter = store.load_or_default("counter").await.unwrap();
        assert_eq!(loaded.count, 7);
        assert_eq!(loaded.label, "");
    }

    #[tokio::test]
    async fn test_revision_counts_writes() {
        let (store, _temp) = create_test_store().await;

        assert_eq!(store.revision("counter").await.unwrap(), None);

        store.save("counter", &Counter::default()).await.unwrap();
        store.save("counter", &Counter::default()).await.unwrap();

        assert_eq!(store.revision("counter").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _temp) = create_test_store().await;

        store.save("a", &1).await.unwrap();
        store.save("b", &2).await.unwrap();
        store.remove("a").await.unwrap();
        store.remove("never-existed").await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["b".to_string()]);
        assert_eq!(store.load_raw("a").await.unwrap(), None);
    }
}
