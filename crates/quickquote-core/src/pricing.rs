//! # Pricing Formulas
//!
//! The whole arithmetic of a quote lives here. Every entry point (add form,
//! table edit, wizard, customer seeding, auto-copy) prices rows through these
//! functions, so no section can diverge in rounding or sign.
//!
//! ```text
//! net_price       = list_price × (1 − discount / 100)
//! line_total      = net_price × quantity
//! gross_new_value = Σ products.line_total − Σ current_assets.line_total
//! ```
//!
//! Products and sums are checked. A result that does not fit in `i64` cents
//! is an `OutOfRange` validation error naming the field that overflowed.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Discount, LineItem};
use crate::validation::ValidationResult;

/// Growth applied by the auto-copy rule, in percent (×1.3).
pub const GROWTH_PERCENT: i64 = 130;

/// Unit price after discount.
///
/// ## Example
/// ```rust
/// use quickquote_core::money::Money;
/// use quickquote_core::pricing::net_price;
/// use quickquote_core::types::Discount;
///
/// let net = net_price(Money::from_cents(500), Discount::from_whole_percent(5));
/// assert_eq!(net.cents(), 475);
/// ```
#[inline]
pub fn net_price(list_price: Money, discount: Discount) -> Money {
    list_price.apply_discount(discount)
}

/// Extended price of one row.
pub fn line_total(net_price: Money, quantity: i64) -> ValidationResult<Money> {
    net_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| overflow("lineTotal"))
}

/// Sum of the cached line totals of a section, saturating at the `i64`
/// bounds. Exact for any quote that passed [`gross_new_value`].
pub fn section_total(items: &[LineItem]) -> Money {
    items.iter().map(|item| item.line_total).sum()
}

/// Net-new contract value: what the new products add over current assets.
pub fn gross_new_value(products: &[LineItem], current_assets: &[LineItem]) -> ValidationResult<Money> {
    checked_section_total(products)?
        .checked_sub(checked_section_total(current_assets)?)
        .ok_or_else(|| overflow("grossNewValue"))
}

fn checked_section_total(items: &[LineItem]) -> ValidationResult<Money> {
    items.iter().try_fold(Money::zero(), |total, item| {
        total
            .checked_add(item.line_total)
            .ok_or_else(|| overflow("sectionTotal"))
    })
}

/// Quantity of an auto-copied row: `ceil(quantity × 1.3)`.
///
/// Integer ceiling division, so 20 → 26 and 1 → 2 with no float error.
pub fn grown_quantity(quantity: i64) -> ValidationResult<i64> {
    let scaled = quantity
        .checked_mul(GROWTH_PERCENT)
        .ok_or_else(|| overflow("quantity"))?;
    Ok(scaled.div_euclid(100) + i64::from(scaled.rem_euclid(100) != 0))
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;

    fn row(list_cents: i64, discount_pct: u32, qty: i64) -> LineItem {
        LineItem::priced(
            "Row",
            qty,
            Money::from_cents(list_cents),
            Discount::from_whole_percent(discount_pct),
            Term::calendar_year(2024),
        )
        .unwrap()
    }

    #[test]
    fn test_net_price_and_line_total() {
        let net = net_price(Money::from_cents(500), Discount::from_whole_percent(5));
        assert_eq!(net.cents(), 475);
        assert_eq!(line_total(net, 20).unwrap().cents(), 9500);
    }

    #[test]
    fn test_full_discount_is_free() {
        let net = net_price(Money::from_cents(153_000), Discount::from_whole_percent(100));
        assert!(net.is_zero());
    }

    #[test]
    fn test_gross_new_value_sign() {
        let assets = vec![row(500, 5, 20), row(300, 7, 10)]; // 95.00 + 27.90
        let products = vec![row(500, 5, 26)]; // 123.50

        assert_eq!(section_total(&assets).cents(), 12_290);
        assert_eq!(gross_new_value(&products, &assets).unwrap().cents(), 60);
        assert_eq!(gross_new_value(&[], &assets).unwrap().cents(), -12_290);
        assert!(gross_new_value(&[], &[]).unwrap().is_zero());
    }

    #[test]
    fn test_overflowing_totals_are_rejected() {
        assert!(matches!(
            line_total(Money::from_cents(153_000), i64::MAX),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut huge = row(100, 0, 1);
        huge.line_total = Money::from_cents(i64::MAX);
        let products = vec![huge.clone(), huge.clone()];
        assert!(gross_new_value(&products, &[]).is_err());

        let mut negative = huge;
        negative.line_total = Money::from_cents(i64::MIN + 1);
        assert!(gross_new_value(&[row(100, 0, 5)], &[negative]).is_err());
    }

    #[test]
    fn test_grown_quantity() {
        assert_eq!(grown_quantity(20).unwrap(), 26);
        assert_eq!(grown_quantity(10).unwrap(), 13);
        assert_eq!(grown_quantity(1).unwrap(), 2);
        assert_eq!(grown_quantity(3).unwrap(), 4);
        assert_eq!(grown_quantity(100).unwrap(), 130);
        assert_eq!(grown_quantity(crate::validation::MAX_QUANTITY).unwrap(), 1_300_000);
        assert!(grown_quantity(i64::MAX / 100).is_err());
    }
}
