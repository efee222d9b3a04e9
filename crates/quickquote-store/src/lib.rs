//! # quickquote-store: Document Storage for QuickQuote
//!
//! Persists the quote collection as a single JSON document under one key,
//! on SQLite (via sqlx) or in memory.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuickQuote Data Flow                              │
//! │                                                                         │
//! │  quickquote-desk command (save_quote, list_quotes, delete_quote)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 quickquote-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  QuoteStore   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  Documents    │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  documents(key = 'quickQuotes', value = '[{...}, {...}]')              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quickquote_store::{Database, DbConfig, QuoteStore};
//!
//! let db = Database::new(DbConfig::new("quickquote.db")).await?;
//! let store = QuoteStore::new(db.documents());
//!
//! let loaded = store.load_all().await;
//! store.delete_quote("QQ3").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::{
    DocumentStore, Documents, LoadedQuotes, MemoryDocuments, QuoteStore, SqliteDocuments,
};
