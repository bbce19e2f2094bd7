//! The Advance Lifecycle Manager and Settlement Reconciliation Engine.
//!
//! This module owns the advance state machine (an explicit transition
//! table), the orchestration of each caller-triggered transition against
//! the entity store, and the pure reconciliation of an advance against
//! actual spend.

mod lifecycle;
mod settlement;
mod transitions;

pub use lifecycle::{AdvanceRequest, LifecycleManager};
pub use settlement::{SettlementDecision, SettlementOutcome, reconcile};
pub use transitions::{AdvanceEvent, next_status};
