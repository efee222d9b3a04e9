//! # Database State
//!
//! Wraps the quote store for use in commands.
//!
//! ## Thread Safety
//! Both backends are safe to share: SQLite through its connection pool,
//! the in-memory backend through an async mutex. Commands can run store
//! operations concurrently without explicit locking; concurrent saves are
//! last-write-wins.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn list_quotes(db: &DbState) -> QuoteListView {
//!     let loaded = db.store().load_all().await;
//!     // ...
//! }
//! ```

use quickquote_store::{
    Database, DbConfig, Documents, MemoryDocuments, QuoteStore, StoreResult,
};
use std::path::Path;
use tracing::info;

/// Quote store plus the database handle behind it (if any).
#[derive(Debug, Clone)]
pub struct DbState {
    store: QuoteStore<Documents>,
    database: Option<Database>,
}

impl DbState {
    /// Opens the SQLite file at `path` and runs migrations.
    pub async fn sqlite(path: &Path, storage_key: &str) -> StoreResult<Self> {
        let database = Database::new(DbConfig::new(path)).await?;
        let documents = Documents::from(database.documents());

        info!(path = %path.display(), storage_key, "Quote store ready");
        Ok(DbState {
            store: QuoteStore::with_key(documents, storage_key),
            database: Some(database),
        })
    }

    /// Process-local store; nothing survives exit.
    pub fn in_memory(storage_key: &str) -> Self {
        info!(storage_key, "Using ephemeral quote store");
        DbState {
            store: QuoteStore::with_key(Documents::from(MemoryDocuments::new()), storage_key),
            database: None,
        }
    }

    pub fn store(&self) -> &QuoteStore<Documents> {
        &self.store
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub async fn health_check(&self) -> bool {
        match &self.database {
            Some(db) => db.health_check().await,
            None => self.store.health_check().await,
        }
    }

    /// Closes the pool on shutdown.
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}
