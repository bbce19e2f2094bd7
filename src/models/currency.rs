//! Currency enumeration for the supported currency set.
//!
//! All monetary amounts in the engine are tagged with a [`Currency`] and
//! normalized to the base currency (SAR) for policy checks and totals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The supported currency set.
///
/// SAR is the base currency; every other currency is converted to SAR via
/// the exchange-rate table before policy evaluation and aggregation.
/// Extending the set means adding a variant here and a rate in `rates.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Saudi Riyal, the base currency.
    SAR,
    /// United States Dollar.
    USD,
    /// Euro.
    EUR,
    /// United Arab Emirates Dirham.
    AED,
}

impl Currency {
    /// The base currency all amounts are normalized to.
    pub const BASE: Currency = Currency::SAR;

    /// Returns true if this is the base currency.
    pub fn is_base(self) -> bool {
        self == Currency::BASE
    }

    /// The 3-letter code for this currency.
    pub fn code(self) -> &'static str {
        match self {
            Currency::SAR => "SAR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::AED => "AED",
        }
    }

    /// All supported currencies, used by config validation to require a
    /// complete exchange-rate table.
    pub fn all() -> [Currency; 4] {
        [Currency::SAR, Currency::USD, Currency::EUR, Currency::AED]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
