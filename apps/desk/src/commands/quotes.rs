//! # Quote List Commands
//!
//! Listing, showing, opening and deleting saved quotes.
//!
//! ## List View Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_quotes() ──► store.load_all() ──► QuoteSummary per quote         │
//! │                         │                                               │
//! │                         └── unreadable? empty list + warning           │
//! │                                                                         │
//! │  select row ─────► open_quote(id) ──► editor (session)                 │
//! │  delete button ──► delete_quote(id) ──► notifier                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, error};

use quickquote_core::{Quote, QuoteEditor, QuoteSummary};

use super::editor::EditorView;
use crate::error::ApiError;
use crate::notify::{Notifier, DELETE_FAILURE, DELETE_SUCCESS};
use crate::state::{DbState, SessionState};

/// Rows of the quote list, most recently modified first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListView {
    pub quotes: Vec<QuoteSummary>,

    /// Set when the stored collection could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Lists saved quotes. Never fails: unreadable storage shows as empty.
pub async fn list_quotes(db: &DbState) -> QuoteListView {
    debug!("list_quotes command");

    let loaded = db.store().load_all().await;
    let warning = loaded
        .error
        .map(|err| ApiError::from(err).message);

    QuoteListView {
        quotes: loaded.quotes.iter().map(QuoteSummary::from).collect(),
        warning,
    }
}

/// Full stored quote by estimate id.
pub async fn get_quote(db: &DbState, estimate_id: &str) -> Result<Quote, ApiError> {
    debug!(estimate_id, "get_quote command");

    db.store()
        .find(estimate_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Quote", estimate_id))
}

/// Loads a stored quote into the editor, replacing whatever was open.
///
/// A quote whose rows no longer price is a `VALIDATION_ERROR` and leaves
/// the open editor alone.
pub async fn open_quote(
    db: &DbState,
    session: &SessionState,
    estimate_id: &str,
) -> Result<EditorView, ApiError> {
    debug!(estimate_id, "open_quote command");

    let quote = get_quote(db, estimate_id).await?;
    let editor = QuoteEditor::open(session.catalog().clone(), quote)?;
    let view = EditorView::from(&editor);

    session.with_session_mut(|s| s.editor = Some(editor));
    Ok(view)
}

/// Deletes a saved quote and tells the user how it went.
///
/// An unknown id is `NOT_FOUND` and writes nothing.
pub async fn delete_quote(
    db: &DbState,
    notifier: &dyn Notifier,
    estimate_id: &str,
) -> Result<(), ApiError> {
    debug!(estimate_id, "delete_quote command");

    match db.store().delete_quote(estimate_id).await {
        Ok(true) => {
            notifier.success(DELETE_SUCCESS);
            Ok(())
        }
        Ok(false) => Err(ApiError::not_found("Quote", estimate_id)),
        Err(err) => {
            error!(estimate_id, error = %err, "Failed to delete quote");
            notifier.error(DELETE_FAILURE);
            Err(err.into())
        }
    }
}
