//! Currency conversion functionality.
//!
//! This module converts an amount in any supported currency to the base
//! currency using the fixed exchange-rate table.

use rust_decimal::Decimal;

use crate::config::FinanceConfig;
use crate::models::Currency;

use super::rounding::round_money;

/// The result of converting an amount to the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// The converted amount in the base currency, rounded to 2 dp.
    pub base_amount: Decimal,
    /// The exchange rate that was applied.
    pub rate: Decimal,
}

/// Converts an amount to the base currency.
///
/// The base amount is `amount × rate`, rounded to 2 decimal places. Base
/// currency amounts pass through a rate of 1 (and are still rounded, so a
/// raw entry of `100.005` becomes `100.01`).
///
/// # Examples
///
/// ```
/// use advance_engine::calculation::to_base_currency;
/// use advance_engine::models::Currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// # use advance_engine::config::ConfigLoader;
/// # let loader = ConfigLoader::load("./config/finance").unwrap();
/// # let config = loader.config();
///
/// let result = to_base_currency(Decimal::from(100), Currency::USD, config);
/// assert_eq!(result.base_amount, Decimal::from_str("375.00").unwrap());
/// ```
pub fn to_base_currency(
    amount: Decimal,
    currency: Currency,
    config: &FinanceConfig,
) -> ConversionResult {
    let rate = config.exchange_rate(currency);
    ConversionResult {
        base_amount: round_money(amount * rate),
        rate,
    }
}
