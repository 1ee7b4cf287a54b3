//! Money calculation helpers
//!
//! Amounts travel as `f64` (wire and storage format) and are computed with
//! `rust_decimal::Decimal` to avoid float drift in totals.

use rust_decimal::prelude::*;

/// Decimal places kept when converting back to `f64`
const DECIMAL_PLACES: u32 = 2;

/// Maximum unit price or delivery fee accepted from input (COP)
pub const MAX_PRICE: f64 = 100_000_000.0;
/// Maximum quantity of one line
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum single payment amount accepted from input (COP)
pub const MAX_PAYMENT_AMOUNT: f64 = 10_000_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Money input within `[0, max]`
///
/// Negative values clamp to zero; `None` when the value is not finite or
/// above `max`.
pub fn bounded(value: f64, max: f64) -> Option<f64> {
    if !value.is_finite() || value > max {
        return None;
    }
    Some(value.max(0.0))
}

pub fn is_valid_quantity(quantity: i32) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}

/// Sum a sequence of amounts
pub fn sum<I: IntoIterator<Item = f64>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .map(to_decimal)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `quantity * unit_price - discount`
pub fn line_subtotal(quantity: i32, unit_price: f64, discount: f64) -> f64 {
    to_f64(
        Decimal::from(quantity)
            .saturating_mul(to_decimal(unit_price))
            .saturating_sub(to_decimal(discount)),
    )
}

/// Portion of `total` not yet covered by `paid`, floored at zero
pub fn remaining(total: f64, paid: f64) -> f64 {
    to_f64(
        to_decimal(total)
            .saturating_sub(to_decimal(paid))
            .max(Decimal::ZERO),
    )
}

/// Whether `paid` goes beyond `total`
pub fn exceeds(paid: f64, total: f64) -> bool {
    to_decimal(paid) > to_decimal(total)
}

/// Equality at two decimal places
pub fn same_amount(a: f64, b: f64) -> bool {
    to_f64(to_decimal(a)) == to_f64(to_decimal(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(2, 10000.0, 0.0), 20000.0);
        assert_eq!(line_subtotal(3, 10000.0, 1500.0), 28500.0);
    }

    #[test]
    fn test_line_subtotal_saturates() {
        let huge = line_subtotal(i32::MAX, 5e28, 0.0);
        assert!(huge.is_finite());
        assert!(huge > 1e28);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(-5.0, MAX_PRICE), Some(0.0));
        assert_eq!(bounded(1500.0, MAX_PRICE), Some(1500.0));
        assert_eq!(bounded(MAX_PRICE + 1.0, MAX_PRICE), None);
        assert_eq!(bounded(f64::NAN, MAX_PRICE), None);
        assert_eq!(bounded(f64::INFINITY, MAX_PAYMENT_AMOUNT), None);
    }

    #[test]
    fn test_quantity_range() {
        assert!(is_valid_quantity(1));
        assert!(is_valid_quantity(MAX_QUANTITY));
        assert!(!is_valid_quantity(0));
        assert!(!is_valid_quantity(MAX_QUANTITY + 1));
    }

    #[test]
    fn test_sum_avoids_float_drift() {
        assert_eq!(to_f64(sum([0.1, 0.2])), 0.3);
    }

    #[test]
    fn test_remaining_is_floored() {
        assert_eq!(remaining(20000.0, 5000.0), 15000.0);
        assert_eq!(remaining(20000.0, 25000.0), 0.0);
    }

    #[test]
    fn test_exceeds() {
        assert!(exceeds(20000.01, 20000.0));
        assert!(!exceeds(20000.0, 20000.0));
    }

    #[test]
    fn test_same_amount() {
        assert!(same_amount(0.1 + 0.2, 0.3));
        assert!(!same_amount(1.0, 1.01));
    }
}
