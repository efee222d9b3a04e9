//! # Commands Module
//!
//! Everything a front end can ask of QuickQuote.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── quotes.rs   ◄─── Quote list: list, show, open, delete
//! ├── editor.rs   ◄─── Open quote: fields, line items, save
//! ├── wizard.rs   ◄─── Guided product entry
//! └── config.rs   ◄─── Configuration and catalog retrieval
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the store
//! async fn list_quotes(db: &DbState)
//!
//! // Only needs the session
//! fn select_customer(session: &SessionState, name: &str)
//!
//! // Store, session and the alert surface
//! async fn save_quote(db: &DbState, session: &SessionState, notifier: &dyn Notifier)
//! ```
//!
//! Every fallible command returns `Result<T, ApiError>`.

pub mod config;
pub mod editor;
pub mod quotes;
pub mod wizard;

pub use config::{get_catalog, get_config};
pub use editor::{
    add_blank_row, add_line_item, advance_estimate_number, discard_quote, get_editor,
    new_quote, remove_line_item, save_quote, select_customer, set_estimate_name,
    set_payment_terms, set_quote_dates, update_line_item, EditorView,
};
pub use quotes::{delete_quote, get_quote, list_quotes, open_quote, QuoteListView};
pub use wizard::{
    finish_wizard_run, start_wizard, wizard_restart, wizard_select_product, wizard_submit,
};
