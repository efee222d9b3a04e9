//! # Editor Commands
//!
//! Commands for the quote being edited.
//!
//! ## Editor Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Editor Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Closed  │────►│   Open   │────►│  Saving  │────►│  Closed  │       │
//! │  │          │     │          │     │          │     │ (n + 1)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       │                │                │                               │
//! │   new_quote       select_customer   save_quote                         │
//! │   open_quote      add_line_item       │                                 │
//! │                   update_line_item    └── invalid? stays Open,          │
//! │                   remove_line_item        notifier shows why            │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   discard_quote ───────────────────► (back to closed)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session lock is only held inside `with_session*` closures, never
//! across a store call.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, warn};

use quickquote_core::collection::{next_estimate_number, parse_estimate_number};
use quickquote_core::{
    LineItemDraft, LineItemId, LineItemUpdate, Money, Quote, QuoteEditor, Section,
};

use crate::error::ApiError;
use crate::notify::{Notifier, SAVE_FAILURE, SAVE_SUCCESS};
use crate::state::{DbState, SessionState};

/// What a front end needs to draw the editor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub quote: Quote,
    pub current_assets_total: Money,
    pub products_total: Money,
    pub estimate_number: u64,
    /// True when the quote was opened from the store.
    pub is_existing: bool,
}

impl From<&QuoteEditor> for EditorView {
    fn from(editor: &QuoteEditor) -> Self {
        EditorView {
            quote: editor.quote().clone(),
            current_assets_total: editor.current_assets_total(),
            products_total: editor.products_total(),
            estimate_number: editor.estimate_number(),
            is_existing: editor.is_existing(),
        }
    }
}

/// Runs `f` against the open editor.
pub(crate) fn with_editor_mut<R>(
    session: &SessionState,
    f: impl FnOnce(&mut QuoteEditor) -> Result<R, ApiError>,
) -> Result<R, ApiError> {
    session.with_session_mut(|s| match s.editor.as_mut() {
        Some(editor) => f(editor),
        None => Err(ApiError::no_open_quote()),
    })
}

fn editor_view(session: &SessionState) -> Result<EditorView, ApiError> {
    session.with_session(|s| {
        s.editor
            .as_ref()
            .map(EditorView::from)
            .ok_or_else(ApiError::no_open_quote)
    })
}

// =============================================================================
// Opening and Closing
// =============================================================================

/// Starts a blank quote.
///
/// The estimate number is the larger of the session counter and one past
/// the highest number already stored, so a fresh session never reuses a
/// saved `estimateId`.
pub async fn new_quote(db: &DbState, session: &SessionState) -> Result<EditorView, ApiError> {
    debug!("new_quote command");

    let stored_next = stored_next_number(db).await;
    let catalog = session.catalog().clone();
    Ok(session.with_session_mut(|s| {
        let number = s.next_estimate_number.max(stored_next);
        s.next_estimate_number = number;

        let editor = QuoteEditor::new(catalog, number);
        let view = EditorView::from(&editor);
        s.editor = Some(editor);
        view
    }))
}

/// One past the highest estimate number in the store.
async fn stored_next_number(db: &DbState) -> u64 {
    let loaded = db.store().load_all().await;
    if let Some(err) = &loaded.error {
        warn!(error = %err, "Numbering without stored quotes");
    }
    next_estimate_number(&loaded.quotes)
}

pub fn get_editor(session: &SessionState) -> Result<EditorView, ApiError> {
    debug!("get_editor command");
    editor_view(session)
}

/// Closes the editor without saving.
pub fn discard_quote(session: &SessionState) -> bool {
    debug!("discard_quote command");
    session.with_session_mut(|s| s.editor.take().is_some())
}

// =============================================================================
// Quote Fields
// =============================================================================

/// Selects a customer: seeds contact, metrics, current assets and name.
pub fn select_customer(session: &SessionState, name: &str) -> Result<EditorView, ApiError> {
    debug!(customer = name, "select_customer command");
    with_editor_mut(session, |editor| {
        editor.select_customer(name)?;
        Ok(EditorView::from(&*editor))
    })
}

pub fn set_estimate_name(session: &SessionState, name: &str) -> Result<EditorView, ApiError> {
    debug!(name, "set_estimate_name command");
    with_editor_mut(session, |editor| {
        editor.set_estimate_name(name)?;
        Ok(EditorView::from(&*editor))
    })
}

pub fn set_payment_terms(session: &SessionState, terms: &str) -> Result<EditorView, ApiError> {
    debug!(terms, "set_payment_terms command");
    with_editor_mut(session, |editor| {
        editor.set_payment_terms(terms)?;
        Ok(EditorView::from(&*editor))
    })
}

pub fn set_quote_dates(
    session: &SessionState,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<EditorView, ApiError> {
    debug!(%start, %end, "set_quote_dates command");
    with_editor_mut(session, |editor| {
        editor.set_quote_dates(start, end)?;
        Ok(EditorView::from(&*editor))
    })
}

/// Re-keys the open quote as the next estimate ("save as new").
///
/// As in [`new_quote`], the new number is past both the session counter and
/// every stored estimate, so saving it never replaces another quote.
pub async fn advance_estimate_number(
    db: &DbState,
    session: &SessionState,
) -> Result<EditorView, ApiError> {
    debug!("advance_estimate_number command");

    let stored_next = stored_next_number(db).await;
    session.with_session_mut(|s| {
        let floor = s.next_estimate_number.max(stored_next);
        let editor = s.editor.as_mut().ok_or_else(ApiError::no_open_quote)?;
        let number = editor.advance_estimate_number(floor);
        s.next_estimate_number = s.next_estimate_number.max(number);
        Ok(EditorView::from(&*editor))
    })
}

// =============================================================================
// Line Items
// =============================================================================

/// Adds a priced row; the list price defaults from the catalog.
pub fn add_line_item(
    session: &SessionState,
    section: Section,
    draft: LineItemDraft,
) -> Result<LineItemId, ApiError> {
    debug!(%section, name = %draft.name, "add_line_item command");
    with_editor_mut(session, |editor| Ok(editor.add_line_item(section, draft)?))
}

pub fn add_blank_row(session: &SessionState, section: Section) -> Result<LineItemId, ApiError> {
    debug!(%section, "add_blank_row command");
    with_editor_mut(session, |editor| Ok(editor.add_blank_row(section)?))
}

/// Applies one cell edit. Unknown row ids are `NOT_FOUND`.
pub fn update_line_item(
    session: &SessionState,
    section: Section,
    id: &LineItemId,
    update: LineItemUpdate,
) -> Result<EditorView, ApiError> {
    debug!(%section, %id, ?update, "update_line_item command");
    with_editor_mut(session, |editor| {
        if !editor.update_line_item(section, id, update)? {
            return Err(ApiError::not_found("Line item", id.as_str()));
        }
        Ok(EditorView::from(&*editor))
    })
}

pub fn remove_line_item(
    session: &SessionState,
    section: Section,
    id: &LineItemId,
) -> Result<EditorView, ApiError> {
    debug!(%section, %id, "remove_line_item command");
    with_editor_mut(session, |editor| {
        if !editor.remove_line_item(section, id)? {
            return Err(ApiError::not_found("Line item", id.as_str()));
        }
        Ok(EditorView::from(&*editor))
    })
}

// =============================================================================
// Save
// =============================================================================

/// Validates and stores the open quote, then closes the editor.
///
/// ## Outcomes
/// - missing required fields: editor stays open, notifier lists them
/// - storage failure: editor stays open, notifier asks to retry
/// - success: editor closes and the session counter moves past this quote
pub async fn save_quote(
    db: &DbState,
    session: &SessionState,
    notifier: &dyn Notifier,
) -> Result<Quote, ApiError> {
    debug!("save_quote command");

    let snapshot = session.with_session(|s| match s.editor.as_ref() {
        Some(editor) => editor.save().map_err(ApiError::from),
        None => Err(ApiError::no_open_quote()),
    });
    let snapshot = match snapshot {
        Ok(quote) => quote,
        Err(err) => {
            notifier.error(&err.message);
            return Err(err);
        }
    };

    let stored = match db.store().save_quote(snapshot).await {
        Ok(quote) => quote,
        Err(err) => {
            error!(error = %err, "Failed to save quote");
            notifier.error(SAVE_FAILURE);
            return Err(err.into());
        }
    };

    let saved_number = parse_estimate_number(&stored.estimate_id).unwrap_or(0);
    session.with_session_mut(|s| {
        let still_open = s
            .editor
            .as_ref()
            .is_some_and(|e| e.quote().estimate_id == stored.estimate_id);
        if still_open {
            s.editor = None;
        }
        s.next_estimate_number = s.next_estimate_number.max(saved_number + 1);
    });

    notifier.success(SAVE_SUCCESS);
    Ok(stored)
}
