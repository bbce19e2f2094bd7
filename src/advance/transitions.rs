//! The advance state machine's transition table.
//!
//! Every status change goes through [`next_status`]: a from-state × event
//! pair either maps to the next state or is rejected. There are no string
//! comparisons at call sites and no transitions outside this table.

use crate::models::AdvanceStatus;

/// The caller-triggered events that move an advance through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceEvent {
    /// Line-manager approval.
    ManagerApprove,
    /// Finance approval.
    FinanceApprove,
    /// Rejection with a reason, valid pre-disbursement.
    Reject,
    /// Payout of the principal.
    Disburse,
    /// Reconciliation against the actual expense total. The returned state
    /// is the nominal `Settled`; the reconciliation decision refines it to
    /// one of the three settled variants.
    Settle,
}

/// Looks up the transition table. Returns `None` for any pair the state
/// machine does not permit.
pub fn next_status(from: AdvanceStatus, event: AdvanceEvent) -> Option<AdvanceStatus> {
    use AdvanceEvent::*;
    use AdvanceStatus::*;

    match (from, event) {
        (Requested, ManagerApprove) => Some(ManagerApproved),
        (ManagerApproved, FinanceApprove) => Some(FinanceApproved),
        (FinanceApproved, Disburse) => Some(Disbursed),
        (Disbursed, Settle) => Some(Settled),
        (Requested | ManagerApproved | FinanceApproved, Reject) => Some(Rejected),
        _ => None,
    }
}
