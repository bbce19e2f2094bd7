//! Travel advance model and related types.
//!
//! The advance record carries its full approval trail: approver names and
//! dates per stage, the disbursement reference, and the settlement result.
//! Status is a closed enum; the lifecycle manager is the sole mutator of
//! status and the financial trailer fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::Currency;

/// How the advance principal is paid out to the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethod {
    /// Direct transfer to the employee's bank account.
    BankTransfer,
    /// Added to the next payroll run.
    Payroll,
    /// Cash from petty cash.
    Cash,
}

/// The two approval stages an advance passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    /// Line-manager approval, first stage.
    Manager,
    /// Finance approval, second stage.
    Finance,
}

impl fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalLevel::Manager => f.write_str("manager"),
            ApprovalLevel::Finance => f.write_str("finance"),
        }
    }
}

/// How a recovery balance is clawed back from the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundMethod {
    /// Deducted from the next payroll run. The default recovery channel.
    PayrollDeduction,
    /// Repaid by the employee via bank transfer.
    BankTransfer,
    /// Repaid in cash.
    Cash,
}

/// Lifecycle status of a travel advance.
///
/// The ordering Requested → ManagerApproved → FinanceApproved → Disbursed →
/// settled is enforced by the lifecycle manager's transition table; the
/// three settled variants refine the terminal state by the sign of the
/// computed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Raised by the employee, awaiting manager approval.
    Requested,
    /// Approved by the line manager, awaiting finance.
    ManagerApproved,
    /// Approved by finance, awaiting disbursement.
    FinanceApproved,
    /// Principal paid out; awaiting settlement at trip end.
    Disbursed,
    /// Terminal: actual spend exactly matched the advance.
    Settled,
    /// Terminal: actual spend exceeded the advance; the employee is owed
    /// the difference.
    SettledOwedToEmployee,
    /// Terminal: actual spend fell short of the advance; the employee owes
    /// the difference back.
    SettledPendingRecovery,
    /// Terminal: declined before disbursement, with a recorded reason.
    Rejected,
}

impl AdvanceStatus {
    /// Returns true for any of the terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AdvanceStatus::Settled
                | AdvanceStatus::SettledOwedToEmployee
                | AdvanceStatus::SettledPendingRecovery
                | AdvanceStatus::Rejected
        )
    }

    /// Returns true for the three settled variants.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            AdvanceStatus::Settled
                | AdvanceStatus::SettledOwedToEmployee
                | AdvanceStatus::SettledPendingRecovery
        )
    }
}

impl fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvanceStatus::Requested => "requested",
            AdvanceStatus::ManagerApproved => "manager_approved",
            AdvanceStatus::FinanceApproved => "finance_approved",
            AdvanceStatus::Disbursed => "disbursed",
            AdvanceStatus::Settled => "settled",
            AdvanceStatus::SettledOwedToEmployee => "settled_owed_to_employee",
            AdvanceStatus::SettledPendingRecovery => "settled_pending_recovery",
            AdvanceStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// An approval-trail entry: who approved a stage and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Display name of the approver.
    pub approver: String,
    /// The date the approval was recorded.
    pub date: NaiveDate,
}

/// A travel advance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelAdvance {
    /// System-assigned identifier.
    pub id: Uuid,
    /// Human-readable number, `ADV-{year}-{5-digit sequence}`, issued by
    /// the store's monotonic counter at creation.
    pub advance_number: String,
    /// The approved travel request this advance draws against.
    pub travel_request_id: Uuid,
    /// Denormalized for display.
    pub employee_id: String,
    /// Denormalized for display.
    pub employee_name: String,
    /// The requested/approved principal.
    pub amount: Decimal,
    /// The currency the principal is denominated in.
    pub currency: Currency,
    /// How the principal is paid out.
    pub payout_method: PayoutMethod,
    /// What the advance is for.
    pub purpose: String,
    /// Current lifecycle status.
    pub status: AdvanceStatus,
    /// The date the advance was requested.
    pub requested_date: NaiveDate,
    /// Manager-stage approval, once recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_approval: Option<ApprovalRecord>,
    /// Finance-stage approval, once recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_approval: Option<ApprovalRecord>,
    /// Unique disbursement reference, once disbursed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursement_reference: Option<String>,
    /// The date the principal was paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursement_date: Option<NaiveDate>,
    /// The actual expense total the advance was reconciled against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_amount: Option<Decimal>,
    /// The date the advance was settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<NaiveDate>,
    /// `amount - settled_amount` once settled; sign determines recovery
    /// versus reimbursement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// `max(balance, 0)` once settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_due: Option<Decimal>,
    /// Resolution channel for a recovery balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_method: Option<RefundMethod>,
    /// Why the advance was rejected, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl TravelAdvance {
    /// Formats a human-readable advance number from a store-issued sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use advance_engine::models::TravelAdvance;
    ///
    /// assert_eq!(TravelAdvance::format_number(2025, 42), "ADV-2025-00042");
    /// ```
    pub fn format_number(year: i32, sequence: u64) -> String {
        format!("ADV-{}-{:05}", year, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!AdvanceStatus::Requested.is_terminal());
        assert!(!AdvanceStatus::ManagerApproved.is_terminal());
        assert!(!AdvanceStatus::FinanceApproved.is_terminal());
        assert!(!AdvanceStatus::Disbursed.is_terminal());
        assert!(AdvanceStatus::Settled.is_terminal());
        assert!(AdvanceStatus::SettledOwedToEmployee.is_terminal());
        assert!(AdvanceStatus::SettledPendingRecovery.is_terminal());
        assert!(AdvanceStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_settled_states() {
        assert!(AdvanceStatus::Settled.is_settled());
        assert!(AdvanceStatus::SettledOwedToEmployee.is_settled());
        assert!(AdvanceStatus::SettledPendingRecovery.is_settled());
        assert!(!AdvanceStatus::Rejected.is_settled());
        assert!(!AdvanceStatus::Disbursed.is_settled());
    }

    #[test]
    fn test_advance_number_format() {
        assert_eq!(TravelAdvance::format_number(2025, 1), "ADV-2025-00001");
        assert_eq!(TravelAdvance::format_number(2025, 123), "ADV-2025-00123");
        assert_eq!(TravelAdvance::format_number(2026, 99999), "ADV-2026-99999");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AdvanceStatus::SettledPendingRecovery).unwrap(),
            "\"settled_pending_recovery\""
        );
        assert_eq!(
            serde_json::to_string(&AdvanceStatus::ManagerApproved).unwrap(),
            "\"manager_approved\""
        );
    }

    #[test]
    fn test_payout_method_serialization() {
        assert_eq!(
            serde_json::to_string(&PayoutMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        assert_eq!(
            serde_json::to_string(&PayoutMethod::Payroll).unwrap(),
            "\"payroll\""
        );
        assert_eq!(
            serde_json::to_string(&PayoutMethod::Cash).unwrap(),
            "\"cash\""
        );
    }

    #[test]
    fn test_refund_method_serialization() {
        assert_eq!(
            serde_json::to_string(&RefundMethod::PayrollDeduction).unwrap(),
            "\"payroll_deduction\""
        );
    }

    #[test]
    fn test_approval_level_display() {
        assert_eq!(ApprovalLevel::Manager.to_string(), "manager");
        assert_eq!(ApprovalLevel::Finance.to_string(), "finance");
    }
}
