//! Configuration types for exchange rates and policy ceilings.
//!
//! This module defines the deserialized shapes of the YAML configuration
//! files and the validated [`FinanceConfig`] the engine works against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{Currency, ExpenseCategory};

/// Contents of `rates.yaml`: the VAT rate and the exchange-rate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// The VAT rate applied to VAT-inclusive base-currency amounts.
    pub vat_rate: Decimal,
    /// Base-currency multiplier per supported currency. Must cover every
    /// supported currency and map the base currency to exactly 1.
    pub rates: HashMap<Currency, Decimal>,
}

/// Contents of `policy.yaml`: per-category spending ceilings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Base-currency ceiling per category. Categories absent from the map
    /// have no ceiling.
    pub ceilings: HashMap<ExpenseCategory, Decimal>,
}

/// The validated finance configuration.
///
/// Constructed through [`FinanceConfig::new`], which enforces the table
/// invariants, so lookups can assume a complete exchange-rate table.
#[derive(Debug, Clone)]
pub struct FinanceConfig {
    vat_rate: Decimal,
    rates: HashMap<Currency, Decimal>,
    ceilings: HashMap<ExpenseCategory, Decimal>,
}

impl FinanceConfig {
    /// Builds a validated configuration from the deserialized file contents.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] when:
    /// - any supported currency is missing from the rate table
    /// - the base currency does not map to exactly 1
    /// - any rate or ceiling is not strictly positive
    /// - the VAT rate is outside (0, 1)
    pub fn new(rates: RatesConfig, policy: PolicyConfig) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: "rates.yaml".to_string(),
            message,
        };

        for currency in Currency::all() {
            match rates.rates.get(&currency) {
                None => {
                    return Err(invalid(format!("missing exchange rate for {}", currency)));
                }
                Some(rate) if *rate <= Decimal::ZERO => {
                    return Err(invalid(format!(
                        "exchange rate for {} must be positive, got {}",
                        currency, rate
                    )));
                }
                Some(_) => {}
            }
        }
        if rates.rates[&Currency::BASE] != Decimal::ONE {
            return Err(invalid(format!(
                "base currency {} must have rate 1, got {}",
                Currency::BASE,
                rates.rates[&Currency::BASE]
            )));
        }
        if rates.vat_rate <= Decimal::ZERO || rates.vat_rate >= Decimal::ONE {
            return Err(invalid(format!(
                "vat_rate must be between 0 and 1 exclusive, got {}",
                rates.vat_rate
            )));
        }
        for (category, ceiling) in &policy.ceilings {
            if *ceiling <= Decimal::ZERO {
                return Err(EngineError::ConfigParseError {
                    path: "policy.yaml".to_string(),
                    message: format!(
                        "ceiling for {} must be positive, got {}",
                        category, ceiling
                    ),
                });
            }
        }

        Ok(Self {
            vat_rate: rates.vat_rate,
            rates: rates.rates,
            ceilings: policy.ceilings,
        })
    }

    /// The VAT rate for base-currency VAT-inclusive amounts.
    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// The base-currency multiplier for a currency.
    pub fn exchange_rate(&self, currency: Currency) -> Decimal {
        // Table completeness is validated at construction.
        self.rates[&currency]
    }

    /// The base-currency ceiling for a category, if one is configured.
    pub fn ceiling(&self, category: ExpenseCategory) -> Option<Decimal> {
        self.ceilings.get(&category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn full_rates() -> HashMap<Currency, Decimal> {
        let mut rates = HashMap::new();
        rates.insert(Currency::SAR, Decimal::ONE);
        rates.insert(Currency::USD, dec("3.75"));
        rates.insert(Currency::EUR, dec("4.05"));
        rates.insert(Currency::AED, dec("1.02"));
        rates
    }

    fn sample_policy() -> PolicyConfig {
        let mut ceilings = HashMap::new();
        ceilings.insert(ExpenseCategory::Accommodation, dec("600"));
        ceilings.insert(ExpenseCategory::Meals, dec("150"));
        PolicyConfig { ceilings }
    }

    #[test]
    fn test_valid_config_accepted() {
        let config = FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates: full_rates(),
            },
            sample_policy(),
        )
        .unwrap();

        assert_eq!(config.vat_rate(), dec("0.15"));
        assert_eq!(config.exchange_rate(Currency::USD), dec("3.75"));
        assert_eq!(config.exchange_rate(Currency::SAR), Decimal::ONE);
        assert_eq!(
            config.ceiling(ExpenseCategory::Accommodation),
            Some(dec("600"))
        );
        assert_eq!(config.ceiling(ExpenseCategory::PerDiem), None);
    }

    #[test]
    fn test_missing_currency_rejected() {
        let mut rates = full_rates();
        rates.remove(&Currency::EUR);
        let result = FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates,
            },
            sample_policy(),
        );
        assert!(matches!(
            result.unwrap_err(),
            EngineError::ConfigParseError { .. }
        ));
    }

    #[test]
    fn test_base_rate_must_be_one() {
        let mut rates = full_rates();
        rates.insert(Currency::SAR, dec("1.01"));
        let result = FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates,
            },
            sample_policy(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut rates = full_rates();
        rates.insert(Currency::USD, dec("-3.75"));
        let result = FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates,
            },
            sample_policy(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_vat_rate_bounds() {
        for bad in ["0", "1", "1.5", "-0.15"] {
            let result = FinanceConfig::new(
                RatesConfig {
                    vat_rate: dec(bad),
                    rates: full_rates(),
                },
                sample_policy(),
            );
            assert!(result.is_err(), "vat_rate {} should be rejected", bad);
        }
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let mut policy = sample_policy();
        policy.ceilings.insert(ExpenseCategory::Taxi, Decimal::ZERO);
        let result = FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates: full_rates(),
            },
            policy,
        );
        assert!(result.is_err());
    }
}
