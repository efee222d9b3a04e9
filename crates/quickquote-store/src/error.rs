//! # Store Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (desk app) ← Serialized for the front end                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Notifier shows "There was an error saving your quote..."              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal. A read failure empties the collection for the
//! caller, a write failure leaves the previous document in place.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored document is not a valid quote collection.
    ///
    /// ## When This Occurs
    /// - Hand-edited or truncated JSON
    /// - A document written by an incompatible tool
    #[error("Stored quotes are unreadable: {0}")]
    Corrupt(String),

    /// Serializing the collection failed.
    #[error("Failed to encode quotes: {0}")]
    Encode(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Decoding failures. Encoding goes through [`StoreError::Encode`] explicitly.
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_map_to_corrupt() {
        let err = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Corrupt(_)));

        let err = serde_json::from_str::<Vec<u32>>("{\"a\": 1}").unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Corrupt(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::Corrupt("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Stored quotes are unreadable: expected value at line 1"
        );
    }
}
