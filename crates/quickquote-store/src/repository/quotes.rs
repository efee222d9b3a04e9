//! # Quote Store
//!
//! The persisted quote collection: one JSON array under one key.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save_quote(q) / delete_quote(id)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read_strict()  ── corrupt document? ──► Err(StoreError::Corrupt)       │
//! │       │                                   (nothing written)             │
//! │       ▼                                                                 │
//! │  collection::upsert / collection::remove  (quickquote-core)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save_all(quotes)  ── sorted, whole array serialized ──► set(key, doc)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`QuoteStore::load_all`] never fails: an unreadable document yields an
//! empty collection and the error travels alongside it. Mutations read
//! strictly so a corrupt document is never overwritten by accident.
//! Concurrent writers are last-write-wins.

use quickquote_core::collection;
use quickquote_core::{Quote, DEFAULT_STORAGE_KEY};
use tracing::{debug, info, warn};

use super::documents::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// Result of [`QuoteStore::load_all`].
#[derive(Debug, Default)]
pub struct LoadedQuotes {
    /// Most recently modified first.
    pub quotes: Vec<Quote>,
    /// Set when the stored document could not be read.
    pub error: Option<StoreError>,
}

/// The saved quote collection on top of a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct QuoteStore<D> {
    documents: D,
    key: String,
}

impl<D: DocumentStore> QuoteStore<D> {
    /// Store under the default `quickQuotes` key.
    pub fn new(documents: D) -> Self {
        Self::with_key(documents, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(documents: D, key: impl Into<String>) -> Self {
        QuoteStore {
            documents,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    /// Loads the whole collection, most recent first.
    ///
    /// Missing document → empty. Unreadable document → empty plus the error.
    pub async fn load_all(&self) -> LoadedQuotes {
        match self.read_strict().await {
            Ok(quotes) => LoadedQuotes {
                quotes,
                error: None,
            },
            Err(err) => {
                warn!(key = %self.key, error = %err, "Treating stored quotes as empty");
                LoadedQuotes {
                    quotes: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }

    /// Serializes and writes the full collection, sorted most recent first.
    pub async fn save_all(&self, quotes: &mut [Quote]) -> StoreResult<()> {
        collection::sort_most_recent_first(quotes);
        let document =
            serde_json::to_string(&*quotes).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.documents.set(&self.key, document).await?;

        debug!(key = %self.key, count = quotes.len(), "Saved quote collection");
        Ok(())
    }

    /// Inserts or replaces by `estimateId`, keeping a replaced entry's
    /// `createdAt`. Returns the quote as stored.
    pub async fn save_quote(&self, quote: Quote) -> StoreResult<Quote> {
        let mut quotes = self.read_strict().await?;
        let estimate_id = quote.estimate_id.clone();

        let outcome = collection::upsert(&mut quotes, quote);
        self.save_all(&mut quotes).await?;

        info!(estimate_id = %estimate_id, ?outcome, "Quote saved");

        collection::find(&quotes, &estimate_id)
            .cloned()
            .ok_or_else(|| StoreError::Internal(format!("{} missing after save", estimate_id)))
    }

    /// Removes exactly the entry keyed `estimate_id`.
    ///
    /// Returns `false` (and writes nothing) when no such quote exists.
    pub async fn delete_quote(&self, estimate_id: &str) -> StoreResult<bool> {
        let mut quotes = self.read_strict().await?;
        if collection::remove(&mut quotes, estimate_id).is_none() {
            debug!(estimate_id, "Delete requested for unknown quote");
            return Ok(false);
        }

        self.save_all(&mut quotes).await?;
        info!(estimate_id, "Quote deleted");
        Ok(true)
    }

    pub async fn find(&self, estimate_id: &str) -> StoreResult<Option<Quote>> {
        let quotes = self.read_strict().await?;
        Ok(collection::find(&quotes, estimate_id).cloned())
    }

    /// True when the backing storage answers a read.
    pub async fn health_check(&self) -> bool {
        self.documents.get(&self.key).await.is_ok()
    }

    async fn read_strict(&self) -> StoreResult<Vec<Quote>> {
        let Some(document) = self.documents.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        if document.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut quotes: Vec<Quote> = serde_json::from_str(&document)?;
        for quote in &mut quotes {
            quote
                .rederive()
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", quote.estimate_id, e)))?;
        }
        collection::sort_most_recent_first(&mut quotes);
        Ok(quotes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
