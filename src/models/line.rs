//! Expense line model and related types.
//!
//! An expense line is owned by exactly one expense claim and has no
//! identity outside it. Lines store the amount exactly as entered, in the
//! entered currency; base-currency amount, VAT portion, and the policy
//! flag are derived on demand by the calculation leaves.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::models::Currency;

/// Expense category for policy-ceiling lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Flights, trains, and other transport to the destination.
    Travel,
    /// Meals and refreshments.
    Meals,
    /// Hotel and lodging.
    Accommodation,
    /// Local taxi and ride-hailing.
    Taxi,
    /// Fuel for rented or private vehicles.
    Fuel,
    /// Fixed daily allowance lines.
    PerDiem,
    /// Anything that fits no other category.
    Misc,
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExpenseCategory::Travel => "travel",
            ExpenseCategory::Meals => "meals",
            ExpenseCategory::Accommodation => "accommodation",
            ExpenseCategory::Taxi => "taxi",
            ExpenseCategory::Fuel => "fuel",
            ExpenseCategory::PerDiem => "per_diem",
            ExpenseCategory::Misc => "misc",
        };
        f.write_str(name)
    }
}

/// A single expense line as entered by the employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// The date the expense was incurred.
    pub expense_date: NaiveDate,
    /// Category used for the policy-ceiling check.
    pub category: ExpenseCategory,
    /// The vendor the expense was paid to.
    pub vendor: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// The currency the amount was entered in.
    pub currency: Currency,
    /// The amount as entered, in `currency`.
    pub amount: Decimal,
    /// Whether `amount` already contains VAT. Only permitted for
    /// base-currency lines; see [`ExpenseLine::validate`].
    #[serde(default)]
    pub vat_included: bool,
    /// Optional reference to an externally stored receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl ExpenseLine {
    /// Validates the line's local preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when:
    /// - `amount` is not strictly positive
    /// - `vendor` is empty
    /// - `vat_included` is set on a non-base-currency line (VAT extraction
    ///   is only defined in the base currency; the flag is rejected rather
    ///   than silently ignored)
    pub fn validate(&self) -> EngineResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                "must be greater than zero",
            ));
        }
        if self.vendor.trim().is_empty() {
            return Err(EngineError::validation("vendor", "must not be empty"));
        }
        if self.vat_included && !self.currency.is_base() {
            return Err(EngineError::validation(
                "vat_included",
                format!(
                    "VAT extraction is only defined for {} lines, not {}",
                    Currency::BASE,
                    self.currency
                ),
            ));
        }
        Ok(())
    }
}

/// A partial update to an expense line.
///
/// `None` fields are left unchanged. The patched line is re-validated as a
/// whole, so a patch cannot leave a line in a state that [`ExpenseLine::validate`]
/// would reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinePatch {
    /// New expense date, if changing.
    pub expense_date: Option<NaiveDate>,
    /// New category, if changing.
    pub category: Option<ExpenseCategory>,
    /// New vendor, if changing.
    pub vendor: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New currency, if changing.
    pub currency: Option<Currency>,
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New VAT-included flag, if changing.
    pub vat_included: Option<bool>,
    /// New receipt reference, if changing. `Some(None)` clears it: an
    /// explicit JSON `null` maps to `Some(None)`, an absent field to
    /// `None`.
    #[serde(default, deserialize_with = "double_option")]
    pub receipt_url: Option<Option<String>>,
}

/// Deserializer for nested options: a present field (including `null`)
/// always produces `Some`, so only absence leaves the outer option empty.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl LinePatch {
    /// Applies this patch to a line, returning the patched copy.
    pub fn apply(&self, line: &ExpenseLine) -> ExpenseLine {
        let mut patched = line.clone();
        if let Some(date) = self.expense_date {
            patched.expense_date = date;
        }
        if let Some(category) = self.category {
            patched.category = category;
        }
        if let Some(vendor) = &self.vendor {
            patched.vendor = vendor.clone();
        }
        if let Some(description) = &self.description {
            patched.description = description.clone();
        }
        if let Some(currency) = self.currency {
            patched.currency = currency;
        }
        if let Some(amount) = self.amount {
            patched.amount = amount;
        }
        if let Some(vat_included) = self.vat_included {
            patched.vat_included = vat_included;
        }
        if let Some(receipt_url) = &self.receipt_url {
            patched.receipt_url = receipt_url.clone();
        }
        patched
    }
}
