//! # quickquote-core: Pure Quoting Logic for QuickQuote
//!
//! Everything QuickQuote knows about quotes, with zero I/O: money, domain
//! types, the catalog, pricing formulas, the quote editor, collection
//! ordering rules and the guided entry wizard.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuickQuote Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  quickquote-desk (app layer)                    │   │
//! │  │   Quote List ──► Editor commands ──► Wizard ──► Notifier        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ quickquote-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │ pricing  │ │  editor  │ │  wizard  │          │   │
//! │  │   │  Quote   │ │ net/line │ │ auto-copy│ │ 4 steps  │          │   │
//! │  │   │ LineItem │ │ gross new│ │ save()   │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE STATE + ARITHMETIC  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             quickquote-store (document storage)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Quote, LineItem, Discount, Section
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - Products, customers, payment terms
//! - [`pricing`] - The derivation formulas
//! - [`editor`] - Working state of one quote
//! - [`collection`] - Ordering and identity of the saved collection
//! - [`wizard`] - Guided product entry
//! - [`validation`] / [`error`] - Input rules and typed errors
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use quickquote_core::{Catalog, QuoteEditor};
//!
//! let mut editor = QuoteEditor::new(Arc::new(Catalog::builtin()), 1);
//! editor.select_customer("Bank of America").unwrap();
//!
//! // Two seeded assets, auto-copied into products at 130%
//! assert_eq!(editor.quote().current_assets.len(), 2);
//! assert_eq!(editor.quote().products[0].quantity, 26);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod collection;
pub mod editor;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use editor::QuoteEditor;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use wizard::{GuidedEntry, GuidedSelection, WizardReply, WizardStep};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the whole quote collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "quickQuotes";

/// Consumption performance above which current assets are auto-copied.
pub const AUTO_COPY_THRESHOLD: u32 = 80;

/// Envelopes purchased when a customer profile does not say otherwise.
pub const DEFAULT_ENVELOPES_PURCHASED: u64 = 10_000;

/// Prefix of estimate ids (`QQ1`, `QQ2`, ...).
pub const ESTIMATE_ID_PREFIX: &str = "QQ";

/// Pause between a finished wizard run and the next product prompt.
pub const WIZARD_RESET_DELAY_MS: u64 = 2_000;
