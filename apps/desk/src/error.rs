//! # API Error Type
//!
//! Unified error type for desk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in QuickQuote                             │
//! │                                                                         │
//! │  Command Function  ──►  Result<T, ApiError>                            │
//! │         │                                                               │
//! │         ├── StoreError::Corrupt / QueryFailed ──┐                      │
//! │         │                                       │                       │
//! │         ├── CoreError::UnknownCustomer ─────────┼──► ApiError          │
//! │         │                                       │   { code, message }  │
//! │         └── ValidationError::MissingFields ─────┘         │            │
//! │                                                           ▼            │
//! │                                       Notifier / front end shows it    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable: the user fixes the input or retries.

use quickquote_core::{CoreError, ValidationError};
use quickquote_store::StoreError;
use serde::Serialize;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Please fill in all required fields: Customer Name"
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quote or catalog entry not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Document storage failed
    StorageError,

    /// Operation not valid in the current session state
    BusinessLogic,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// No quote is open in the editor.
    pub fn no_open_quote() -> Self {
        ApiError::new(ErrorCode::BusinessLogic, "No quote is open for editing")
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt(e) => {
                tracing::error!("Stored quotes are unreadable: {}", e);
                ApiError::new(
                    ErrorCode::StorageError,
                    "Saved quotes could not be read. Please try again.",
                )
            }
            StoreError::ConnectionFailed(_) | StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Storage is unavailable")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Storage migration failed")
            }
            StoreError::Encode(e) | StoreError::QueryFailed(e) | StoreError::Internal(e) => {
                tracing::error!("Storage operation failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownCustomer(name) => ApiError::not_found("Customer", &name),
            CoreError::UnknownProduct(name) => ApiError::not_found("Product", &name),
            CoreError::UnknownPaymentTerms(terms) => {
                ApiError::validation(format!("Unknown payment terms: {}", terms))
            }
            CoreError::InvalidCatalog(e) => ApiError::internal(format!("Invalid catalog: {}", e)),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
