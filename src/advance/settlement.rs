//! Settlement reconciliation.
//!
//! Pure comparison of an advance's principal against the actual expense
//! total. The engine never mutates state: it returns a decision record the
//! lifecycle manager applies atomically.

use rust_decimal::Decimal;

use crate::calculation::round_money;
use crate::error::{EngineError, EngineResult};
use crate::models::{AdvanceStatus, RefundMethod};

/// Classification of a settlement by the sign of the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Actual spend exactly matched the advance.
    Balanced,
    /// Actual spend fell short; the surplus is recovered from the employee.
    PendingRecovery,
    /// Actual spend exceeded the advance; the employee is owed the excess.
    OwedToEmployee,
}

/// The decision record a settlement produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementDecision {
    /// The actual expense total the advance was reconciled against.
    pub settled_amount: Decimal,
    /// `advance_amount − actual_total`, 2 dp.
    pub balance: Decimal,
    /// `max(balance, 0)`: the amount to recover from the employee.
    pub refund_due: Decimal,
    /// The recovery channel; set only when there is something to recover.
    pub refund_method: Option<RefundMethod>,
    /// The refined terminal status the advance moves to.
    pub status: AdvanceStatus,
    /// The sign classification.
    pub outcome: SettlementOutcome,
}

/// Reconciles an advance principal against the actual expense total.
///
/// `balance = advance_amount − actual_total`:
/// - positive balance ⇒ the employee spent less than advanced; the surplus
///   is due back, by payroll deduction by default, and the advance settles
///   as pending recovery
/// - negative balance ⇒ the employee spent more than advanced; nothing is
///   due back and the advance settles as owed to the employee
/// - zero ⇒ balanced settlement
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `actual_total` is negative.
///
/// # Examples
///
/// ```
/// use advance_engine::advance::{SettlementOutcome, reconcile};
/// use rust_decimal::Decimal;
///
/// let decision = reconcile(Decimal::from(5000), Decimal::from(4200)).unwrap();
/// assert_eq!(decision.balance, Decimal::from(800));
/// assert_eq!(decision.outcome, SettlementOutcome::PendingRecovery);
/// ```
pub fn reconcile(advance_amount: Decimal, actual_total: Decimal) -> EngineResult<SettlementDecision> {
    if actual_total < Decimal::ZERO {
        return Err(EngineError::validation(
            "actual_total",
            "must not be negative",
        ));
    }

    let balance = round_money(advance_amount - actual_total);
    let (status, outcome, refund_due, refund_method) = if balance > Decimal::ZERO {
        (
            AdvanceStatus::SettledPendingRecovery,
            SettlementOutcome::PendingRecovery,
            balance,
            Some(RefundMethod::PayrollDeduction),
        )
    } else if balance < Decimal::ZERO {
        (
            AdvanceStatus::SettledOwedToEmployee,
            SettlementOutcome::OwedToEmployee,
            Decimal::ZERO,
            None,
        )
    } else {
        (
            AdvanceStatus::Settled,
            SettlementOutcome::Balanced,
            Decimal::ZERO,
            None,
        )
    };

    Ok(SettlementDecision {
        settled_amount: actual_total,
        balance,
        refund_due,
        refund_method,
        status,
        outcome,
    })
}
