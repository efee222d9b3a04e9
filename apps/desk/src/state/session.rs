//! # Session State
//!
//! The quote being edited, the guided-entry wizard and the session's estimate
//! counter.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Editor, wizard and save commands all touch it
//! 2. Only one command should modify it at a time
//! 3. Commands never observe a half-applied edit
//!
//! The lock is a synchronous `std::sync::Mutex`: commands copy what they
//! need out of the session before awaiting the store, and never hold the
//! guard across an `.await`.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  new_quote() ─────► editor = QuoteEditor::new(catalog, next_number)    │
//! │  open_quote(id) ──► editor = QuoteEditor::open(catalog, stored)        │
//! │  edit commands ───► editor.select_customer / add_line_item / ...       │
//! │  wizard_submit() ─► wizard.submit ─► editor.add_line_item(Products)    │
//! │  save_quote() ────► editor.save() ─► store ─► editor = None,           │
//! │                                                next_number += 1        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use quickquote_core::{Catalog, GuidedEntry, QuoteEditor};

/// Mutable per-session data.
#[derive(Debug)]
pub struct Session {
    /// Quote currently open, if any.
    pub editor: Option<QuoteEditor>,

    /// Guided-entry state machine.
    pub wizard: GuidedEntry,

    /// Number the next new quote is keyed with (`QQ<n>`).
    pub next_estimate_number: u64,
}

/// Shared session handle.
#[derive(Debug, Clone)]
pub struct SessionState {
    catalog: Arc<Catalog>,
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a session with nothing open and the counter at 1.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let session = Session {
            editor: None,
            wizard: GuidedEntry::new(Arc::clone(&catalog)),
            next_estimate_number: 1,
        };

        SessionState {
            catalog,
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let open = session.with_session(|s| s.editor.is_some());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickquote_core::WizardStep;

    #[test]
    fn test_new_session_is_idle() {
        let state = SessionState::new(Arc::new(Catalog::builtin()));
        state.with_session(|s| {
            assert!(s.editor.is_none());
            assert_eq!(s.next_estimate_number, 1);
            assert_eq!(s.wizard.step(), WizardStep::ChoosingProduct);
        });
    }

    #[test]
    fn test_clones_share_session() {
        let state = SessionState::new(Arc::new(Catalog::builtin()));
        let other = state.clone();
        state.with_session_mut(|s| s.next_estimate_number = 7);
        assert_eq!(other.with_session(|s| s.next_estimate_number), 7);
    }
}
