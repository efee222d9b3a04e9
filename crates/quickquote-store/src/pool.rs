//! # Database Pool
//!
//! Opens the SQLite database that holds the quote documents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / DbConfig::in_memory()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbLocation::connect_options()   file: WAL + NORMAL sync, created      │
//! │       │                          memory: one pinned connection         │
//! │       ▼                                                                 │
//! │  Database::new(config).await ──► migrations ──► db.documents()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets the list view read while a save is writing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::documents::SqliteDocuments;

// =============================================================================
// Configuration
// =============================================================================

/// Where the documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private in-memory database; gone when the pool closes.
    Memory,
}

impl DbLocation {
    fn connect_options(&self) -> StoreResult<SqliteConnectOptions> {
        match self {
            DbLocation::File(path) => Ok(SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string())),
        }
    }
}

impl std::fmt::Display for DbLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Pool settings for [`Database::new`].
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/quickquote.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Default: 4 (file), 1 (memory)
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Apply pending migrations on open. Default: true
    pub migrate: bool,
}

impl DbConfig {
    /// File-backed database at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 4,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            migrate: true,
        }
    }

    /// In-memory database for tests and `--ephemeral` runs.
    ///
    /// Every connection to `:memory:` is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the document database. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool, then migrates when `config.migrate` is set.
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(location = %config.location, "Opening quote database");

        let options = config.location.connect_options()?;
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.location == DbLocation::Memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Key/value document access over this pool.
    pub fn documents(&self) -> SqliteDocuments {
        SqliteDocuments::new(self.pool.clone())
    }

    /// Closes the pool. Later document operations fail.
    pub async fn close(&self) {
        debug!("Closing quote database");
        self.pool.close().await;
    }

    /// True when the database answers and every embedded migration has
    /// been applied.
    pub async fn health_check(&self) -> bool {
        match migrations::migration_status(&self.pool).await {
            Ok((total, applied)) if applied == total => true,
            Ok((total, applied)) => {
                warn!(total, applied, "Quote database is missing migrations");
                false
            }
            Err(err) => {
                debug!(error = %err, "Quote database health check failed");
                false
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
