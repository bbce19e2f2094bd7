//! Request types for the engine's HTTP API.
//!
//! This module defines the JSON request structures for the advance, claim,
//! and report endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ApprovalLevel, Currency, ExpenseCategory, ExpenseLine, PayoutMethod, TravelRequestStatus,
};

/// Request body for seeding a travel request (owned by an external module;
/// exposed here so deployments and tests can provision trip data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRequestCreate {
    /// The requesting employee's id.
    pub employee_id: String,
    /// The requesting employee's display name.
    pub employee_name: String,
    /// Trip destination.
    pub destination: String,
    /// First day of travel.
    pub start_date: NaiveDate,
    /// Last day of travel.
    pub end_date: NaiveDate,
    /// Approval status as decided by the owning module.
    pub status: TravelRequestStatus,
}

/// Request body for `POST /advances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceCreate {
    /// The approved travel request to draw against.
    pub travel_request_id: Uuid,
    /// The requested principal.
    pub amount: Decimal,
    /// The currency of the principal.
    pub currency: Currency,
    /// How the principal is paid out.
    pub payout_method: PayoutMethod,
    /// What the advance is for.
    pub purpose: String,
}

/// Request body for `POST /advances/{id}/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceApprove {
    /// The approval stage being recorded.
    pub level: ApprovalLevel,
    /// Display name of the approver.
    pub approver: String,
    /// The approver's role, checked against the capability predicate.
    pub role: String,
}

/// Request body for `POST /advances/{id}/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceReject {
    /// Why the advance is rejected. Must not be empty.
    pub reason: String,
    /// Who rejected it.
    pub actor: String,
}

/// Request body for `POST /advances/{id}/disburse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceDisburse {
    /// Who triggered the payout.
    pub actor: String,
}

/// Request body for `POST /advances/{id}/settle`.
///
/// Exactly one of `actual_total` and `report_id` must be provided: either
/// the caller supplies the actual expense figure directly, or names a
/// finalized expense report to take it from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceSettle {
    /// The actual expense total, in the advance's currency.
    #[serde(default)]
    pub actual_total: Option<Decimal>,
    /// A finalized report to settle from.
    #[serde(default)]
    pub report_id: Option<Uuid>,
    /// Who triggered the settlement.
    pub actor: String,
}

/// An expense line in a claim request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineCreate {
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
    /// The amount as entered.
    pub amount: Decimal,
    /// Whether the amount already contains VAT.
    #[serde(default)]
    pub vat_included: bool,
    /// Optional receipt reference from `POST /receipts`.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl From<LineCreate> for ExpenseLine {
    fn from(request: LineCreate) -> Self {
        ExpenseLine {
            expense_date: request.expense_date,
            category: request.category,
            vendor: request.vendor,
            description: request.description,
            currency: request.currency,
            amount: request.amount,
            vat_included: request.vat_included,
            receipt_url: request.receipt_url,
        }
    }
}

/// Request body for `POST /claims`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimCreate {
    /// The employee the claim belongs to.
    pub employee_id: String,
    /// The date the claim is raised.
    pub claim_date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Initial lines. At least one is required.
    pub lines: Vec<LineCreate>,
}

/// Request body for `POST /claims/{id}/per-diem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerDiemCreate {
    /// Number of per-diem days.
    pub days: u32,
    /// Daily rate in the base currency.
    pub daily_rate: Decimal,
}

/// Request body for `POST /claims/{id}/decide`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDecide {
    /// True approves, false rejects.
    pub approved: bool,
    /// The deciding caller's role, checked against the capability
    /// predicate.
    pub role: String,
}

/// Request body for `POST /reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCreate {
    /// The trip the report covers.
    pub travel_request_id: Uuid,
    /// The advance the report settles, if any.
    #[serde(default)]
    pub advance_id: Option<Uuid>,
    /// The claims to roll up.
    pub claim_ids: Vec<Uuid>,
}

/// Request body for `POST /reports/{id}/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFinalize {
    /// Who finalized the report.
    pub actor: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_create_converts_to_model() {
        let json = r#"{
            "expense_date": "2025-04-02",
            "category": "meals",
            "vendor": "Cafe",
            "currency": "USD",
            "amount": "100"
        }"#;
        let request: LineCreate = serde_json::from_str(json).unwrap();
        let line: ExpenseLine = request.into();
        assert_eq!(line.category, ExpenseCategory::Meals);
        assert_eq!(line.currency, Currency::USD);
        assert!(!line.vat_included);
        assert_eq!(line.receipt_url, None);
    }

    #[test]
    fn test_settle_request_accepts_either_source() {
        let by_total: AdvanceSettle =
            serde_json::from_str(r#"{"actual_total": "4200", "actor": "Huda"}"#).unwrap();
        assert!(by_total.actual_total.is_some());
        assert!(by_total.report_id.is_none());

        let by_report: AdvanceSettle = serde_json::from_str(
            r#"{"report_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "actor": "Huda"}"#,
        )
        .unwrap();
        assert!(by_report.actual_total.is_none());
        assert!(by_report.report_id.is_some());
    }
}
