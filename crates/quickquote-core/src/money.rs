//! # Money
//!
//! Every amount on a quote is an `i64` count of cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Floats drift:   0.1 + 0.2 = 0.30000000000000004                        │
//! │                                                                         │
//! │  Summed over a quote with dozens of lines the error shows up in the    │
//! │  gross new value column. So prices, net prices and line totals are     │
//! │  whole cents, and only the document boundary (serde) speaks dollars.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quickquote_core::money::Money;
//! use quickquote_core::types::Discount;
//!
//! let list_price = Money::from_cents(500); // $5.00
//! let net = list_price.apply_discount(Discount::from_bps(500)); // 5% off
//! assert_eq!(net.cents(), 475);
//! assert_eq!(net.checked_multiply_quantity(20).map(|m| m.cents()), Some(9500));
//! ```
//!
//! ## Overflow
//! Pricing goes through the `checked_*` methods and turns `None` into a
//! validation error. The operators saturate at the `i64` bounds instead of
//! wrapping, so summing already-validated totals can never panic.
//!
//! ## Document Format
//! Persisted quotes store money as a decimal number of dollars (`4.75`).
//! Incoming values are rounded to the nearest cent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use crate::types::Discount;

/// An amount of US cents. Signed: the gross new value of a renewal worth
/// less than the current assets is negative.
///
/// ```text
/// Catalog list price ──► LineItem.list_price ──► net_price ──► line_total
///
/// Σ products.line_total − Σ current_assets.line_total = gross new value
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// ```rust
    /// use quickquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(153_000).to_string(), "$1530.00");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a dollar amount to the nearest cent; `None` for NaN, infinities
    /// and amounts beyond `i64` cents.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() {
            return None;
        }
        let cents = (dollars * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Dollar value for documents. Never used for arithmetic.
    #[inline]
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Extended amount for `qty` units; `None` when it does not fit.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, rhs: Money) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, rhs: Money) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Price after `discount`.
    ///
    /// The amount taken off is rounded half-up to the cent, so `$3.00` at 7%
    /// nets `$2.79` and `$5.00` at 5% nets `$4.75`.
    pub fn apply_discount(&self, discount: Discount) -> Money {
        // i128: list price × 10_000 bps overflows i64 near $9e12
        let off = (self.0 as i128 * discount.bps() as i128 + 5_000) / 10_000;
        Money(self.0 - off as i64)
    }
}

/// `$4.75`, `-$95.00`. Logs and tests only; the desk app formats with the
/// configured currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Money::from_dollars(dollars)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid money amount: {dollars}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dollars_rounds_to_cents() {
        assert_eq!(Money::from_dollars(4.75).unwrap().cents(), 475);
        assert_eq!(Money::from_dollars(2.79).unwrap().cents(), 279);
        assert_eq!(Money::from_dollars(1530.0).unwrap().cents(), 153_000);
        assert_eq!(Money::from_dollars(0.005).unwrap().cents(), 1);
        assert!(Money::from_dollars(f64::NAN).is_none());
        assert!(Money::from_dollars(f64::INFINITY).is_none());
    }

    #[test]
    fn test_display_shows_sign_before_symbol() {
        assert_eq!(Money::from_cents(475).to_string(), "$4.75");
        assert_eq!(Money::from_cents(-9500).to_string(), "-$95.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_gross_new_value_can_go_negative() {
        let products = Money::from_cents(2790);
        let assets = Money::from_cents(9500);
        let gnv = products - assets;
        assert!(gnv.is_negative());
        assert_eq!(gnv.cents(), -6710);
        assert_eq!((gnv + assets).cents(), 2790);
        assert_eq!((products * 2).cents(), 5580);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let price = Money::from_cents(153_000);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(459_000)));
        assert_eq!(price.checked_multiply_quantity(i64::MAX), None);

        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(price.checked_sub(price), Some(Money::zero()));
    }

    #[test]
    fn test_operators_saturate_instead_of_wrapping() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!((Money::from_cents(153_000) * i64::MAX).cents(), i64::MAX);

        let total: Money = [max, max].iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let totals = [Money::from_cents(9500), Money::from_cents(2790)];
        let total: Money = totals.iter().sum();
        assert_eq!(total.cents(), 12_290);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
        assert!(!empty.is_positive());
    }

    #[test]
    fn test_apply_discount_rounds_half_up() {
        let net = |cents, bps| Money::from_cents(cents).apply_discount(Discount::from_bps(bps)).cents();
        assert_eq!(net(500, 500), 475);
        assert_eq!(net(300, 700), 279);
        assert_eq!(net(350, 1_000), 315);
        assert_eq!(net(500, 0), 500);
        assert_eq!(net(500, 10_000), 0);
        // 0.5 cent off rounds up to 1 cent
        assert_eq!(net(10, 500), 9);
    }

    #[test]
    fn test_serde_uses_dollars() {
        assert_eq!(serde_json::to_string(&Money::from_cents(475)).unwrap(), "4.75");

        let parsed: Money = serde_json::from_str("95").unwrap();
        assert_eq!(parsed.cents(), 9500);

        let parsed: Money = serde_json::from_str("2.79").unwrap();
        assert_eq!(parsed.cents(), 279);
    }
}
