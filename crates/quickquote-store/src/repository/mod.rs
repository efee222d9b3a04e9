//! # Repository Module
//!
//! Storage repositories for QuickQuote.
//!
//! ```text
//!   QuoteStore<D>          quote collection semantics (load/save/delete)
//!        │
//!        ▼
//!   D: DocumentStore       whole documents by key
//!        ├── SqliteDocuments
//!        └── MemoryDocuments
//! ```

pub mod documents;
pub mod quotes;

pub use documents::{DocumentStore, Documents, MemoryDocuments, SqliteDocuments};
pub use quotes::{LoadedQuotes, QuoteStore};
