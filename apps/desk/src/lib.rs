//! # QuickQuote Desk
//!
//! Application layer of QuickQuote: configuration, session state, the command
//! surface and terminal rendering.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    QuickQuote Desk Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (terminal today: main.rs + cli.rs)       │   │
//! │  │   list / show / delete / new / wizard                           │   │
//! │  └───────────────────────────┬─────────────────────────────────────┘   │
//! │                              │ plain async fns                          │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │                    Commands (Rust)                              │   │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐        │   │
//! │  │  │  quotes  │  │  editor  │  │  wizard  │  │  config  │        │   │
//! │  │  └──────────┘  └──────────┘  └──────────┘  └──────────┘        │   │
//! │  └───────────────────────────┬─────────────────────────────────────┘   │
//! │                              │                                          │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │                    State                                        │   │
//! │  │  DbState ─► QuoteStore     SessionState ─► editor + wizard      │   │
//! │  │  ConfigState (read-only)   Notifier ─► alert surface            │   │
//! │  └───────────────────────────┬─────────────────────────────────────┘   │
//! │                              │                                          │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │        quickquote-core + quickquote-store (SQLite, sqlx)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod notify;
pub mod state;
pub mod view;

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};
pub use notify::{Notifier, NotifyLevel, RecordingNotifier, TerminalNotifier};
pub use state::{ConfigState, DbState, SessionState};

/// Everything a front end needs, wired together.
#[derive(Debug, Clone)]
pub struct App {
    pub config: ConfigState,
    pub db: DbState,
    pub session: SessionState,
}

impl App {
    /// Loads the catalog, opens storage and starts an empty session.
    ///
    /// ## Startup Sequence
    /// ```text
    /// 1. Catalog ──── built in, or QUICKQUOTE_CATALOG
    /// 2. Storage ──── SQLite (migrations applied) or memory when ephemeral
    /// 3. Session ──── no quote open, counter at 1
    /// ```
    ///
    /// Failing to open storage is the only fatal startup error.
    pub async fn start(
        config: ConfigState,
        ephemeral: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let catalog = Arc::new(config.load_catalog()?);
        info!(
            products = catalog.products.len(),
            customers = catalog.customers.len(),
            "Catalog loaded"
        );

        let db = if ephemeral {
            DbState::in_memory(&config.storage_key)
        } else {
            let path = get_database_path(&config)?;
            info!(?path, "Database path determined");
            DbState::sqlite(&path, &config.storage_key).await?
        };

        Ok(App {
            session: SessionState::new(catalog),
            db,
            config,
        })
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - ERROR: Failures shown to the user
/// - WARN: Recoverable storage problems
/// - INFO: Lifecycle (startup, saves, deletes)
/// - DEBUG: Command entry and state changes
///
/// Override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quickquote=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.quickquote.desk/quickquote.db`
/// - **Windows**: `%APPDATA%\quickquote\desk\data\quickquote.db`
/// - **Linux**: `~/.local/share/desk/quickquote.db`
///
/// `QUICKQUOTE_DB_PATH` (via [`ConfigState`]) overrides all of these.
pub fn get_database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "quickquote", "desk")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("quickquote.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_override() {
        let config = ConfigState {
            database_path: Some(PathBuf::from("/tmp/override.db")),
            ..ConfigState::default()
        };
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/override.db")
        );
    }

    #[tokio::test]
    async fn test_ephemeral_start() {
        let app = App::start(ConfigState::default(), true).await.unwrap();
        assert!(app.db.database().is_none());
        assert_eq!(app.db.store().key(), "quickQuotes");
        assert!(app.session.with_session(|s| s.editor.is_none()));
    }
}
