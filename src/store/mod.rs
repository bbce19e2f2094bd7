//! External collaborator seams.
//!
//! The engine talks to its collaborators through traits: the persisted
//! entity store (with status-conditional writes for optimistic
//! concurrency), the receipt file store, the outbound notification hook,
//! and the approval capability predicate. The shipped implementations are
//! in-memory; a deployment swaps in real ones behind the same traits.

mod memory;

pub use memory::{MemoryReceiptStore, MemoryStore};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AdvanceStatus, ClaimStatus, ExpenseClaim, ExpenseReport, ReportStatus, TravelAdvance,
    TravelRequest,
};

/// Store of the persisted entity kinds.
///
/// Conditional updates take the status the caller last read; the store
/// compares it against the persisted status under its per-entity lock and
/// returns [`crate::error::EngineError::Conflict`] on a mismatch. This is
/// the check-then-act guard every state transition relies on.
pub trait EntityStore: Send + Sync {
    /// Persists a travel request (seed data; requests are decided by an
    /// external module).
    fn insert_travel_request(&self, request: TravelRequest) -> EngineResult<()>;
    /// Fetches a travel request by id.
    fn get_travel_request(&self, id: Uuid) -> EngineResult<TravelRequest>;

    /// Issues the next value of the monotonic advance-number sequence.
    /// Never derived from a record count.
    fn next_advance_sequence(&self) -> u64;
    /// Persists a new advance.
    fn insert_advance(&self, advance: TravelAdvance) -> EngineResult<()>;
    /// Fetches an advance by id.
    fn get_advance(&self, id: Uuid) -> EngineResult<TravelAdvance>;
    /// Lists all advances.
    fn list_advances(&self) -> EngineResult<Vec<TravelAdvance>>;
    /// Replaces an advance only if its persisted status still equals
    /// `expected`.
    fn update_advance_if(
        &self,
        expected: AdvanceStatus,
        advance: TravelAdvance,
    ) -> EngineResult<()>;

    /// Persists a new claim.
    fn insert_claim(&self, claim: ExpenseClaim) -> EngineResult<()>;
    /// Fetches a claim by id.
    fn get_claim(&self, id: Uuid) -> EngineResult<ExpenseClaim>;
    /// Replaces a claim only if its persisted status still equals
    /// `expected`.
    fn update_claim_if(&self, expected: ClaimStatus, claim: ExpenseClaim) -> EngineResult<()>;
    /// Deletes a claim. The caller checks deletability first.
    fn delete_claim(&self, id: Uuid) -> EngineResult<()>;

    /// Persists a new report.
    fn insert_report(&self, report: ExpenseReport) -> EngineResult<()>;
    /// Fetches a report by id.
    fn get_report(&self, id: Uuid) -> EngineResult<ExpenseReport>;
    /// Replaces a report only if its persisted status still equals
    /// `expected`.
    fn update_report_if(&self, expected: ReportStatus, report: ExpenseReport) -> EngineResult<()>;
}

/// Stores receipt files and returns stable reference URLs.
pub trait ReceiptStore: Send + Sync {
    /// Stores a binary payload, returning a stable reference URL. The
    /// engine never inspects the file's contents.
    fn store(&self, filename: &str, bytes: &[u8]) -> EngineResult<String>;
}

/// Payload of the outbound notification hook, fired on every successful
/// state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionNotice {
    /// The entity kind that transitioned.
    pub entity_type: &'static str,
    /// The entity id.
    pub entity_id: Uuid,
    /// The state the entity moved to.
    pub new_state: String,
    /// Who triggered the transition.
    pub actor: String,
    /// The principal amount, where relevant.
    pub amount: Option<Decimal>,
    /// The settlement balance, where relevant.
    pub balance: Option<Decimal>,
}

/// Outbound notification hook. Fire-and-forget from the engine's point of
/// view: a delivery failure never rolls back the state transition it
/// reports.
pub trait Notifier: Send + Sync {
    /// Delivers a transition notice. Errors are logged by the caller and
    /// otherwise ignored.
    fn notify(&self, notice: &TransitionNotice) -> Result<(), String>;
}

/// Notifier that logs transitions through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &TransitionNotice) -> Result<(), String> {
        tracing::info!(
            entity_type = notice.entity_type,
            entity_id = %notice.entity_id,
            new_state = %notice.new_state,
            actor = %notice.actor,
            amount = ?notice.amount,
            balance = ?notice.balance,
            "State transition"
        );
        Ok(())
    }
}

/// Opaque approval capability predicate, supplied by an external
/// authorization collaborator.
pub trait ApprovalPolicy: Send + Sync {
    /// Whether the given role may approve claims and advances.
    fn can_approve(&self, role: &str) -> bool;
}

/// Policy that grants approval capability to every role.
#[derive(Debug, Clone, Default)]
pub struct AllowAll;

impl ApprovalPolicy for AllowAll {
    fn can_approve(&self, _role: &str) -> bool {
        true
    }
}

/// Policy that grants approval capability to a fixed role set.
#[derive(Debug, Clone)]
pub struct RoleSet {
    roles: std::collections::HashSet<String>,
}

impl RoleSet {
    /// Builds a policy from the roles that may approve.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl ApprovalPolicy for RoleSet {
    fn can_approve(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all_grants_everything() {
        assert!(AllowAll.can_approve("manager"));
        assert!(AllowAll.can_approve("anyone"));
    }

    #[test]
    fn test_role_set_is_exact() {
        let policy = RoleSet::new(["manager", "finance"]);
        assert!(policy.can_approve("manager"));
        assert!(policy.can_approve("finance"));
        assert!(!policy.can_approve("employee"));
        assert!(!policy.can_approve("Manager"));
    }

    #[test]
    fn test_log_notifier_never_fails() {
        let notice = TransitionNotice {
            entity_type: "travel_advance",
            entity_id: Uuid::new_v4(),
            new_state: "disbursed".to_string(),
            actor: "finance_user".to_string(),
            amount: Some(Decimal::new(500000, 2)),
            balance: None,
        };
        assert!(LogNotifier.notify(&notice).is_ok());
    }
}
