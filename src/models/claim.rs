//! Expense claim model and related types.
//!
//! A claim owns an ordered collection of expense lines and caches the
//! derived totals. The cached fields are a materialized view: they are only
//! ever written by the aggregator's single recompute function, never edited
//! independently.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::ExpenseLine;

/// Lifecycle status of an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Editable; the only state in which lines may change or the claim
    /// may be deleted.
    Draft,
    /// Awaiting a decision; lines are frozen.
    Submitted,
    /// Terminal: accepted by an approver.
    Approved,
    /// Terminal: declined by an approver.
    Rejected,
}

impl ClaimStatus {
    /// Returns true for the two terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimStatus::Draft => "draft",
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// An expense claim: an ordered list of lines plus cached totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseClaim {
    /// System-assigned identifier.
    pub id: Uuid,
    /// The employee the claim belongs to.
    pub employee_id: String,
    /// The date the claim was raised.
    pub claim_date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// The owned expense lines, in entry order. At least one at creation.
    pub lines: Vec<ExpenseLine>,
    /// Cached: sum of every line's base-currency amount, 2 dp.
    pub total_amount_sar: Decimal,
    /// Cached: sum of every line's extracted VAT, 2 dp.
    pub vat_total_sar: Decimal,
    /// Cached: number of lines.
    pub lines_count: usize,
    /// Lifecycle status.
    pub status: ClaimStatus,
}
