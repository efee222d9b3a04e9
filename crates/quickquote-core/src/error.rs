//! # Errors
//!
//! Failures raised while building a quote.
//!
//! ```text
//! ValidationError ──► CoreError ──► ApiError (desk) ──► Notifier
//!   bad input          catalog       {code, message}     toast line
//!                      lookups
//! ```
//!
//! Nothing here is fatal. An operation that fails leaves the editor as it
//! was, so the user can correct the input and try again.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors from catalog lookups and editor operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer is not in the catalog.
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),

    /// Product name is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Payment terms are not one of the catalog's options.
    #[error("Unknown payment terms: {0}")]
    UnknownPaymentTerms(String),

    /// A catalog file is inconsistent or malformed.
    ///
    /// ## When This Occurs
    /// - JSON does not parse
    /// - A customer's default asset names a product missing from the catalog
    /// - Duplicate customer or product names
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Rejected input; see [`ValidationError`].
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A value the user typed or picked that cannot go on a quote.
///
/// `field` is the label shown next to the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Outside the inclusive `min..=max` window.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not a number, end before start).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Not one of a fixed list (payment terms, sections).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Several required fields missing at once (save).
    #[error("Please fill in all required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
