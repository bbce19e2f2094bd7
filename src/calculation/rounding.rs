//! Monetary rounding.
//!
//! All monetary results in the engine are rounded to 2 decimal places with
//! commercial (midpoint-away-from-zero) rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to 2 decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use advance_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("12.345").unwrap();
/// assert_eq!(round_money(amount), Decimal::from_str("12.35").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(round_money(dec("375.001")), dec("375.00"));
        assert_eq!(round_money(dec("12.345")), dec("12.35"));
        assert_eq!(round_money(dec("12.344")), dec("12.34"));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(round_money(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn test_already_rounded_unchanged() {
        assert_eq!(round_money(dec("100.50")), dec("100.50"));
        assert_eq!(round_money(Decimal::ZERO), Decimal::ZERO);
    }
}
