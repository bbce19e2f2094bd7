//! Expense report model.
//!
//! A report is the trip-level roll-up of one or more approved claims. Its
//! total feeds settlement: a final report's total is the actual-expense
//! figure the advance is reconciled against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of an expense report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Claim set may still change; total recomputed on read.
    Draft,
    /// Frozen; total is immutable and usable for settlement.
    Final,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Draft => f.write_str("draft"),
            ReportStatus::Final => f.write_str("final"),
        }
    }
}

/// An expense report rolling up claims for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    /// System-assigned identifier.
    pub id: Uuid,
    /// The trip this report covers.
    pub travel_request_id: Uuid,
    /// The advance this report settles, if one was disbursed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_id: Option<Uuid>,
    /// The claims rolled up by this report.
    pub claim_ids: Vec<Uuid>,
    /// Sum of the referenced claims' base-currency totals, 2 dp.
    pub total_amount_sar: Decimal,
    /// Lifecycle status.
    pub status: ReportStatus,
}
