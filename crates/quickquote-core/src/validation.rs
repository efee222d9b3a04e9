//! # Validation Module
//!
//! Input validation for the quote editor and the guided entry wizard.
//!
//! The front end only offers closed lists for customers, products and
//! payment terms, so what reaches this module is free text: quantities,
//! discounts and names. The editor calls these before every mutation and
//! keeps its state untouched when one fails.
//!
//! ## Usage
//! ```rust
//! use quickquote_core::validation::{parse_discount, parse_quantity};
//!
//! assert_eq!(parse_quantity("20").unwrap(), 20);
//! assert!(parse_quantity("0").is_err());
//! assert_eq!(parse_discount("7.5%").unwrap().bps(), 750);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Discount;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted estimate name.
pub const MAX_ESTIMATE_NAME_LEN: usize = 200;

/// Largest quantity accepted on a row.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest list price accepted on a row ($1,000,000,000.00).
pub const MAX_LIST_PRICE: Money = Money::from_cents(100_000_000_000);

// =============================================================================
// String Validators
// =============================================================================

fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates an estimate name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_estimate_name(name: &str) -> ValidationResult<()> {
    validate_required("estimateName", name)?;

    if name.trim().chars().count() > MAX_ESTIMATE_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "estimateName".to_string(),
            max: MAX_ESTIMATE_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a list price on a table edit.
///
/// ## Rules
/// - Between 0 and [`MAX_LIST_PRICE`] inclusive
pub fn validate_list_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > MAX_LIST_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "listPrice".to_string(),
            min: 0,
            max: MAX_LIST_PRICE.cents(),
        });
    }
    Ok(())
}

/// Validates the list price of a row being added.
///
/// ## Rules
/// - Must be strictly positive: a zero price means no product was chosen
/// - At most [`MAX_LIST_PRICE`]
pub fn validate_add_list_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "listPrice".to_string(),
        });
    }
    validate_list_price(price)
}

/// Validates a discount.
///
/// ## Rules
/// - Between 0% and 100% inclusive, on every mutation path
pub fn validate_discount(discount: Discount) -> ValidationResult<()> {
    if discount.bps() > Discount::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Free-Text Parsers (wizard input)
// =============================================================================

/// Parses a typed quantity: an integer in `1..=MAX_QUANTITY`.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a whole number".to_string(),
        })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses a typed discount percentage in [0, 100]; a trailing `%` is allowed.
pub fn parse_discount(input: &str) -> ValidationResult<Discount> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    let pct: f64 = number.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "discount".to_string(),
        reason: "must be a number".to_string(),
    })?;

    Discount::try_from_percentage(pct).ok_or_else(|| ValidationError::OutOfRange {
        field: "discount".to_string(),
        min: 0,
        max: 100,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
