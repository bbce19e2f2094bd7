//! Policy ceiling evaluation.
//!
//! This module checks a single expense line's base-currency amount against
//! the configured per-category ceiling. Violations are advisory: they are
//! surfaced to the approver and never block submission.

use rust_decimal::Decimal;

use crate::config::FinanceConfig;
use crate::models::ExpenseCategory;

/// The result of a policy-ceiling check.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyCheck {
    /// The ceiling that applied, if the category has one.
    pub ceiling: Option<Decimal>,
    /// True when a ceiling exists and the base amount strictly exceeds it.
    pub violation: bool,
}

/// Checks a base-currency amount against the category's ceiling.
///
/// A line violates policy when a ceiling is configured for its category and
/// the base amount is strictly greater than the ceiling. An amount exactly
/// at the ceiling does not violate. Categories without a ceiling never
/// violate.
///
/// # Examples
///
/// ```
/// use advance_engine::calculation::check_policy;
/// use advance_engine::models::ExpenseCategory;
/// use rust_decimal::Decimal;
/// # use advance_engine::config::ConfigLoader;
/// # let loader = ConfigLoader::load("./config/finance").unwrap();
/// # let config = loader.config();
///
/// let check = check_policy(Decimal::from(1000), ExpenseCategory::Accommodation, config);
/// assert!(check.violation);
/// ```
pub fn check_policy(
    base_amount: Decimal,
    category: ExpenseCategory,
    config: &FinanceConfig,
) -> PolicyCheck {
    match config.ceiling(category) {
        Some(ceiling) => PolicyCheck {
            ceiling: Some(ceiling),
            violation: base_amount > ceiling,
        },
        None => PolicyCheck {
            ceiling: None,
            violation: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyConfig, RatesConfig};
    use crate::models::Currency;
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
        ceilings.insert(ExpenseCategory::Meals, dec("150"));
        FinanceConfig::new(
            RatesConfig {
                vat_rate: dec("0.15"),
                rates,
            },
            PolicyConfig { ceilings },
        )
        .unwrap()
    }

    /// amount above ceiling violates
    #[test]
    fn test_amount_above_ceiling_violates() {
        let check = check_policy(dec("1000"), ExpenseCategory::Accommodation, &test_config());
        assert!(check.violation);
        assert_eq!(check.ceiling, Some(dec("600")));
    }

    /// amount at ceiling does not violate
    #[test]
    fn test_amount_at_ceiling_passes() {
        let check = check_policy(dec("600"), ExpenseCategory::Accommodation, &test_config());
        assert!(!check.violation);
    }

    /// amount below ceiling does not violate
    #[test]
    fn test_amount_below_ceiling_passes() {
        let check = check_policy(dec("599.99"), ExpenseCategory::Accommodation, &test_config());
        assert!(!check.violation);
    }

    /// category without a ceiling never violates
    #[test]
    fn test_category_without_ceiling_never_violates() {
        let check = check_policy(dec("1000000"), ExpenseCategory::PerDiem, &test_config());
        assert!(!check.violation);
        assert_eq!(check.ceiling, None);
    }
}
