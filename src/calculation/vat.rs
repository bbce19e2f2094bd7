//! VAT extraction functionality.
//!
//! This module splits a VAT-inclusive amount into its net and tax portions.
//! Extraction is defined only for base-currency amounts: the tax is
//! `round(amount × vat_rate, 2)` and the net is the remainder, so the two
//! always recompose to the original amount exactly.

use rust_decimal::Decimal;

use crate::models::Currency;

use super::rounding::round_money;

/// The net and tax portions of an amount.
#[derive(Debug, Clone, PartialEq)]
pub struct VatSplit {
    /// The extracted VAT portion, 2 dp. Zero for lines without the
    /// VAT-included flag.
    pub vat: Decimal,
    /// The amount net of VAT. `net + vat` equals the input amount.
    pub net: Decimal,
}

/// Splits an amount into net and VAT portions.
///
/// When `vat_included` is set and the currency is the base currency,
/// `vat = round(amount × vat_rate, 2)` and `net = amount − vat`. In every
/// other case the VAT portion is zero and the net is the full amount.
/// Callers enforce at validation time that the flag is never set for
/// foreign-currency lines.
///
/// # Examples
///
/// ```
/// use advance_engine::calculation::split_vat;
/// use advance_engine::models::Currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = Decimal::from_str("0.15").unwrap();
/// let split = split_vat(Decimal::from(115), Currency::SAR, true, rate);
/// assert_eq!(split.vat, Decimal::from_str("17.25").unwrap());
/// assert_eq!(split.net, Decimal::from_str("97.75").unwrap());
/// ```
pub fn split_vat(
    amount: Decimal,
    currency: Currency,
    vat_included: bool,
    vat_rate: Decimal,
) -> VatSplit {
    if vat_included && currency.is_base() {
        let vat = round_money(amount * vat_rate);
        VatSplit {
            vat,
            net: amount - vat,
        }
    } else {
        VatSplit {
            vat: Decimal::ZERO,
            net: amount,
        }
    }
}
