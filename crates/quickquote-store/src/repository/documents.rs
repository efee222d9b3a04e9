//! # Document Repository
//!
//! Whole-string documents addressed by key. The quote collection is one such
//! document; nothing here knows what a quote is.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       DocumentStore trait                               │
//! │                 get(key) -> Option<String>                              │
//! │                 set(key, value)                                         │
//! │                                                                         │
//! │   ┌──────────────────────┐   ┌──────────────────────┐                  │
//! │   │   SqliteDocuments    │   │   MemoryDocuments    │                  │
//! │   │  documents table     │   │  Mutex<HashMap>      │                  │
//! │   │  (persistent)        │   │  (tests, ephemeral)  │                  │
//! │   └──────────────────────┘   └──────────────────────┘                  │
//! │                  └──────── Documents (either) ────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreResult;

/// Key/value storage of whole documents.
pub trait DocumentStore: Send + Sync {
    /// Returns the document stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Replaces the document stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = StoreResult<()>> + Send;
}

// =============================================================================
// SQLite
// =============================================================================

/// Documents in the `documents` table.
#[derive(Debug, Clone)]
pub struct SqliteDocuments {
    pool: SqlitePool,
}

impl SqliteDocuments {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDocuments { pool }
    }
}

impl DocumentStore for SqliteDocuments {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM documents WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key, found = value.is_some(), "Read document");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        debug!(key, bytes = value.len(), "Writing document");

        sqlx::query(
            r#"
            INSERT INTO documents (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Documents held in process memory; cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocuments {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocuments {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.inner.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// Either Backend
// =============================================================================

/// Backend chosen at startup.
#[derive(Debug, Clone)]
pub enum Documents {
    Sqlite(SqliteDocuments),
    Memory(MemoryDocuments),
}

impl DocumentStore for Documents {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Documents::Sqlite(docs) => docs.get(key).await,
            Documents::Memory(docs) => docs.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        match self {
            Documents::Sqlite(docs) => docs.set(key, value).await,
            Documents::Memory(docs) => docs.set(key, value).await,
        }
    }
}

impl From<SqliteDocuments> for Documents {
    fn from(docs: SqliteDocuments) -> Self {
        Documents::Sqlite(docs)
    }
}

impl From<MemoryDocuments> for Documents {
    fn from(docs: MemoryDocuments) -> Self {
        Documents::Memory(docs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_sqlite_get_set() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let docs = db.documents();

        assert_eq!(docs.get("quickQuotes").await.unwrap(), None);

        docs.set("quickQuotes", "[]".to_string()).await.unwrap();
        assert_eq!(docs.get("quickQuotes").await.unwrap().as_deref(), Some("[]"));

        docs.set("quickQuotes", "[1]".to_string()).await.unwrap();
        assert_eq!(docs.get("quickQuotes").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(docs.get("other").await.unwrap(), None);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_memory_clones_share_state() {
        let docs = MemoryDocuments::new();
        let clone = docs.clone();
        docs.set("k", "v".to_string()).await.unwrap();
        assert_eq!(clone.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_either_backend_delegates() {
        let memory = MemoryDocuments::new();
        let docs = Documents::from(memory.clone());
        docs.set("k", "v".to_string()).await.unwrap();
        assert_eq!(memory.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
