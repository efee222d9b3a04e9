//! # Notifications
//!
//! The alert surface: short messages telling the user whether a save or
//! delete worked. Commands talk to a [`Notifier`] instead of printing, so the
//! terminal, a GUI or a test can each show them their own way.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

pub const SAVE_SUCCESS: &str = "Quick Quote saved successfully!";
pub const SAVE_FAILURE: &str = "There was an error saving your quote. Please try again.";
pub const DELETE_SUCCESS: &str = "Quote deleted.";
pub const DELETE_FAILURE: &str = "There was an error deleting your quote. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Success,
    Error,
}

/// Receives user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotifyLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotifyLevel::Error, message);
    }
}

/// Prints to stdout (success) and stderr (errors).
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success => println!("✔ {}", message),
            NotifyLevel::Error => eprintln!("✖ {}", message),
        }
    }
}

/// Keeps every message; used by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(NotifyLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyLevel, String)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<(NotifyLevel, String)> {
        self.messages().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}
