//! # Wizard Commands
//!
//! Guided product entry for the open quote.
//!
//! ```text
//! start_wizard ──► greeting + product options
//!      │
//!      ▼
//! wizard_select_product / wizard_submit ──► reply per step
//!      │
//!      └── run complete? ──► editor.add_line_item(Products, selection)
//!                              │
//!                              ▼
//!                        finish_wizard_run (waits, then restarts)
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use quickquote_core::{GuidedEntry, Section, WizardReply, WizardStep};

use crate::error::ApiError;
use crate::state::{ConfigState, Session, SessionState};

/// Resets the wizard and returns the greeting.
pub fn start_wizard(session: &SessionState) -> WizardReply {
    debug!("start_wizard command");
    let catalog = Arc::clone(session.catalog());
    session.with_session_mut(|s| {
        s.wizard = GuidedEntry::new(catalog);
        s.wizard.greeting()
    })
}

/// Picks a product (a click on one of the offered options).
pub fn wizard_select_product(
    session: &SessionState,
    product: &str,
) -> Result<WizardReply, ApiError> {
    debug!(product, "wizard_select_product command");
    session.with_session_mut(|s| {
        ensure_editor(s)?;
        Ok(s.wizard.select_product(product))
    })
}

/// Feeds typed input to the wizard.
///
/// A reply carrying a completed selection has already been added to the
/// products section of the open quote. If the editor rejects the row, the
/// wizard is rolled back to where it was before this input and the error
/// is returned instead of the reply.
pub fn wizard_submit(session: &SessionState, input: &str) -> Result<WizardReply, ApiError> {
    debug!(input, "wizard_submit command");
    session.with_session_mut(|s| {
        ensure_editor(s)?;
        let Session { editor, wizard, .. } = s;

        let before = wizard.clone();
        let reply = wizard.submit(input);
        if let (Some(selection), Some(editor)) = (&reply.completed, editor.as_mut()) {
            if let Err(err) = editor.add_line_item(Section::Products, selection.clone().into_draft()) {
                warn!(error = %err, product = %selection.name, "Wizard selection rejected");
                *wizard = before;
                return Err(err.into());
            }
        }
        Ok(reply)
    })
}

pub fn wizard_restart(session: &SessionState) -> WizardReply {
    debug!("wizard_restart command");
    session.with_session_mut(|s| s.wizard.restart())
}

/// Waits the configured reset delay, then returns the wizard to product
/// choice. Returns `None` if the user already moved on.
pub async fn finish_wizard_run(
    session: &SessionState,
    config: &ConfigState,
) -> Option<WizardReply> {
    tokio::time::sleep(config.wizard_reset_delay()).await;

    session.with_session_mut(|s| {
        (s.wizard.step() == WizardStep::Done).then(|| s.wizard.restart())
    })
}

fn ensure_editor(session: &Session) -> Result<(), ApiError> {
    match session.editor {
        Some(_) => Ok(()),
        None => Err(ApiError::no_open_quote()),
    }
}
