//! Per-line derivation.
//!
//! Composes the currency, VAT, and policy leaves into the full derived view
//! of a single expense line: base-currency amount, VAT portion, net-of-VAT
//! amount, and the policy flag. Nothing here is stored; the claim
//! aggregator recomputes it from the entered fields on every mutation.

use rust_decimal::Decimal;

use crate::config::FinanceConfig;
use crate::models::ExpenseLine;

use super::currency::to_base_currency;
use super::policy::{PolicyCheck, check_policy};
use super::vat::split_vat;

/// The full derived view of one expense line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDerivation {
    /// The line amount converted to the base currency, 2 dp.
    pub base_amount: Decimal,
    /// The VAT portion of the entered amount (base-currency lines with the
    /// VAT-included flag; zero otherwise).
    pub vat: Decimal,
    /// The entered amount net of VAT.
    pub net: Decimal,
    /// The policy-ceiling check against the base amount.
    pub policy: PolicyCheck,
}

/// Derives the computed fields for one line.
pub fn derive_line(line: &ExpenseLine, config: &FinanceConfig) -> LineDerivation {
    let conversion = to_base_currency(line.amount, line.currency, config);
    let vat_split = split_vat(
        line.amount,
        line.currency,
        line.vat_included,
        config.vat_rate(),
    );
    let policy = check_policy(conversion.base_amount, line.category, config);

    LineDerivation {
        base_amount: conversion.base_amount,
        vat: vat_split.vat,
        net: vat_split.net,
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyConfig, RatesConfig};
    use crate::models::{Currency, ExpenseCategory};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_config() -> FinanceConfig {
        let mut rates = HashMap::new();
        rates.insert(Currency::SAR, Decimal::ONE);
        rates.insert(Currency::USD, dec("3.75"));
        rates.insert(Currency::EUR, dec("4.05"));
        rates.insert(Currency::AED, dec("1.02"));
        let mut ceilings = HashMap::new();
        ceilings.insert(ExpenseCategory::Accommodation, dec("600"));
        FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates,
            },
            PolicyConfig { ceilings },
        )
        .unwrap()
    }

    fn line(
        category: ExpenseCategory,
        currency: Currency,
        amount: &str,
        vat_included: bool,
    ) -> ExpenseLine {
        ExpenseLine {
            expense_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            category,
            vendor: "Vendor".to_string(),
            description: String::new(),
            currency,
            amount: dec(amount),
            vat_included,
            receipt_url: None,
        }
    }

    /// base-currency VAT-included line derives all fields
    #[test]
    fn test_base_currency_line_with_vat() {
        let derived = derive_line(
            &line(ExpenseCategory::Accommodation, Currency::SAR, "1000", true),
            &test_config(),
        );
        assert_eq!(derived.base_amount, dec("1000.00"));
        assert_eq!(derived.vat, dec("150.00"));
        assert_eq!(derived.net, dec("850.00"));
        assert!(derived.policy.violation);
    }

    /// foreign line converts before the policy check
    #[test]
    fn test_foreign_line_converted_before_policy() {
        // 200 USD -> 750 SAR, above the 600 accommodation ceiling
        let derived = derive_line(
            &line(ExpenseCategory::Accommodation, Currency::USD, "200", false),
            &test_config(),
        );
        assert_eq!(derived.base_amount, dec("750.00"));
        assert_eq!(derived.vat, Decimal::ZERO);
        assert!(derived.policy.violation);
    }

    /// line without ceiling or VAT derives cleanly
    #[test]
    fn test_plain_line() {
        let derived = derive_line(
            &line(ExpenseCategory::PerDiem, Currency::SAR, "300", false),
            &test_config(),
        );
        assert_eq!(derived.base_amount, dec("300.00"));
        assert_eq!(derived.vat, Decimal::ZERO);
        assert_eq!(derived.net, dec("300"));
        assert!(!derived.policy.violation);
    }
}
