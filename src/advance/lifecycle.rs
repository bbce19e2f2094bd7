//! The Advance Lifecycle Manager.
//!
//! Drives a travel advance from request through approval, disbursement,
//! and settlement. Every transition re-verifies the persisted status via a
//! conditional write, fires the notification hook after a successful
//! write, and is the sole writer of the advance's status and financial
//! trailer fields.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{round_money, to_base_currency};
use crate::claims::recompute_totals;
use crate::config::FinanceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdvanceStatus, ApprovalLevel, ApprovalRecord, ClaimStatus, Currency, ExpenseReport,
    PayoutMethod, ReportStatus, TravelAdvance, TravelRequestStatus,
};
use crate::store::{ApprovalPolicy, EntityStore, Notifier, TransitionNotice};

use super::settlement::reconcile;
use super::transitions::{AdvanceEvent, next_status};

/// Parameters for requesting a new advance.
#[derive(Debug, Clone)]
pub struct AdvanceRequest {
    /// The approved travel request the advance draws against.
    pub travel_request_id: Uuid,
    /// The requested principal. Must be strictly positive.
    pub amount: Decimal,
    /// The currency the principal is denominated in.
    pub currency: Currency,
    /// How the principal is to be paid out.
    pub payout_method: PayoutMethod,
    /// What the advance is for. Must not be empty.
    pub purpose: String,
}

/// Orchestrates advance state transitions against the entity store.
pub struct LifecycleManager {
    config: FinanceConfig,
    store: Arc<dyn EntityStore>,
    notifier: Arc<dyn Notifier>,
    approvals: Arc<dyn ApprovalPolicy>,
}

impl LifecycleManager {
    /// Creates a manager over the given collaborators.
    pub fn new(
        config: FinanceConfig,
        store: Arc<dyn EntityStore>,
        notifier: Arc<dyn Notifier>,
        approvals: Arc<dyn ApprovalPolicy>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
            approvals,
        }
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Fires the notification hook. Delivery failure is logged and never
    /// rolls back the transition it reports.
    fn notify(&self, notice: TransitionNotice) {
        if let Err(message) = self.notifier.notify(&notice) {
            warn!(
                entity_type = notice.entity_type,
                entity_id = %notice.entity_id,
                error = %message,
                "Notification delivery failed"
            );
        }
    }

    fn transition_error(operation: &str, current: AdvanceStatus) -> EngineError {
        EngineError::StateTransition {
            entity: "travel_advance".to_string(),
            operation: operation.to_string(),
            current: current.to_string(),
        }
    }

    /// Requests a new advance against an approved travel request.
    ///
    /// The travel request's approval status is re-verified here rather
    /// than trusted from the caller.
    pub fn request_advance(&self, request: AdvanceRequest) -> EngineResult<TravelAdvance> {
        if request.amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                "must be greater than zero",
            ));
        }
        if request.purpose.trim().is_empty() {
            return Err(EngineError::validation("purpose", "must not be empty"));
        }

        let travel_request = self.store.get_travel_request(request.travel_request_id)?;
        if travel_request.status != TravelRequestStatus::Approved {
            return Err(EngineError::validation(
                "travel_request_id",
                format!(
                    "travel request {} is {}, not approved",
                    travel_request.id, travel_request.status
                ),
            ));
        }

        let today = Self::today();
        let sequence = self.store.next_advance_sequence();
        let advance = TravelAdvance {
            id: Uuid::new_v4(),
            advance_number: TravelAdvance::format_number(today.year(), sequence),
            travel_request_id: travel_request.id,
            employee_id: travel_request.employee_id.clone(),
            employee_name: travel_request.employee_name.clone(),
            amount: round_money(request.amount),
            currency: request.currency,
            payout_method: request.payout_method,
            purpose: request.purpose,
            status: AdvanceStatus::Requested,
            requested_date: today,
            manager_approval: None,
            finance_approval: None,
            disbursement_reference: None,
            disbursement_date: None,
            settled_amount: None,
            settlement_date: None,
            balance: None,
            refund_due: None,
            refund_method: None,
            rejection_reason: None,
        };
        self.store.insert_advance(advance.clone())?;

        info!(
            advance_id = %advance.id,
            advance_number = %advance.advance_number,
            amount = %advance.amount,
            currency = %advance.currency,
            "Advance requested"
        );
        self.notify(TransitionNotice {
            entity_type: "travel_advance",
            entity_id: advance.id,
            new_state: advance.status.to_string(),
            actor: advance.employee_id.clone(),
            amount: Some(advance.amount),
            balance: None,
        });
        Ok(advance)
    }

    /// Approves an advance at the given stage.
    ///
    /// Valid only when the current state matches the stage's expected
    /// predecessor (`Requested` for manager, `ManagerApproved` for
    /// finance). A mismatched level is an error, never a silent state
    /// change.
    pub fn approve(
        &self,
        advance_id: Uuid,
        level: ApprovalLevel,
        approver: &str,
        role: &str,
    ) -> EngineResult<TravelAdvance> {
        if approver.trim().is_empty() {
            return Err(EngineError::validation("approver", "must not be empty"));
        }
        if !self.approvals.can_approve(role) {
            return Err(EngineError::validation(
                "role",
                format!("role '{}' cannot approve advances", role),
            ));
        }

        let mut advance = self.store.get_advance(advance_id)?;
        let event = match level {
            ApprovalLevel::Manager => AdvanceEvent::ManagerApprove,
            ApprovalLevel::Finance => AdvanceEvent::FinanceApprove,
        };
        let from = advance.status;
        let next = next_status(from, event)
            .ok_or_else(|| Self::transition_error(&format!("{} approve", level), from))?;

        let record = ApprovalRecord {
            approver: approver.to_string(),
            date: Self::today(),
        };
        match level {
            ApprovalLevel::Manager => advance.manager_approval = Some(record),
            ApprovalLevel::Finance => advance.finance_approval = Some(record),
        }
        advance.status = next;
        self.store.update_advance_if(from, advance.clone())?;

        info!(
            advance_id = %advance.id,
            level = %level,
            approver = %approver,
            new_status = %advance.status,
            "Advance approved"
        );
        self.notify(TransitionNotice {
            entity_type: "travel_advance",
            entity_id: advance.id,
            new_state: advance.status.to_string(),
            actor: approver.to_string(),
            amount: Some(advance.amount),
            balance: None,
        });
        Ok(advance)
    }

    /// Rejects an advance with a reason. Valid from any non-terminal
    /// pre-disbursement state.
    pub fn reject(
        &self,
        advance_id: Uuid,
        reason: &str,
        actor: &str,
    ) -> EngineResult<TravelAdvance> {
        if reason.trim().is_empty() {
            return Err(EngineError::validation(
                "reason",
                "a rejection requires a non-empty reason",
            ));
        }

        let mut advance = self.store.get_advance(advance_id)?;
        let from = advance.status;
        let next = next_status(from, AdvanceEvent::Reject)
            .ok_or_else(|| Self::transition_error("reject", from))?;

        advance.status = next;
        advance.rejection_reason = Some(reason.to_string());
        self.store.update_advance_if(from, advance.clone())?;

        info!(advance_id = %advance.id, reason = %reason, "Advance rejected");
        self.notify(TransitionNotice {
            entity_type: "travel_advance",
            entity_id: advance.id,
            new_state: advance.status.to_string(),
            actor: actor.to_string(),
            amount: Some(advance.amount),
            balance: None,
        });
        Ok(advance)
    }

    /// Disburses a finance-approved advance, stamping a unique reference.
    pub fn disburse(&self, advance_id: Uuid, actor: &str) -> EngineResult<TravelAdvance> {
        let mut advance = self.store.get_advance(advance_id)?;
        let from = advance.status;
        let next = next_status(from, AdvanceEvent::Disburse)
            .ok_or_else(|| Self::transition_error("disburse", from))?;

        advance.status = next;
        advance.disbursement_reference = Some(format!("DSB-{}", Uuid::new_v4()));
        advance.disbursement_date = Some(Self::today());
        self.store.update_advance_if(from, advance.clone())?;

        info!(
            advance_id = %advance.id,
            reference = advance.disbursement_reference.as_deref().unwrap_or(""),
            "Advance disbursed"
        );
        self.notify(TransitionNotice {
            entity_type: "travel_advance",
            entity_id: advance.id,
            new_state: advance.status.to_string(),
            actor: actor.to_string(),
            amount: Some(advance.amount),
            balance: None,
        });
        Ok(advance)
    }

    /// Settles a disbursed advance against the actual expense total.
    ///
    /// Delegates the balance computation to the reconciliation engine and
    /// applies its decision atomically. Settling an already-settled
    /// advance fails with a state-transition error rather than recomputing
    /// a different balance.
    pub fn settle(
        &self,
        advance_id: Uuid,
        actual_total: Decimal,
        actor: &str,
    ) -> EngineResult<TravelAdvance> {
        let mut advance = self.store.get_advance(advance_id)?;
        let from = advance.status;
        next_status(from, AdvanceEvent::Settle)
            .ok_or_else(|| Self::transition_error("settle", from))?;

        let decision = reconcile(advance.amount, round_money(actual_total))?;
        advance.status = decision.status;
        advance.settled_amount = Some(decision.settled_amount);
        advance.settlement_date = Some(Self::today());
        advance.balance = Some(decision.balance);
        advance.refund_due = Some(decision.refund_due);
        advance.refund_method = decision.refund_method;
        self.store.update_advance_if(from, advance.clone())?;

        info!(
            advance_id = %advance.id,
            balance = %decision.balance,
            new_status = %advance.status,
            "Advance settled"
        );
        self.notify(TransitionNotice {
            entity_type: "travel_advance",
            entity_id: advance.id,
            new_state: advance.status.to_string(),
            actor: actor.to_string(),
            amount: Some(advance.amount),
            balance: Some(decision.balance),
        });
        Ok(advance)
    }

    /// Settles an advance from a finalized expense report's total.
    ///
    /// Report totals are kept in the base currency; the reconciliation runs
    /// in the advance's own currency, so the total is converted back at the
    /// advance's rate before the balance is computed.
    pub fn settle_from_report(
        &self,
        advance_id: Uuid,
        report_id: Uuid,
        actor: &str,
    ) -> EngineResult<TravelAdvance> {
        let report = self.store.get_report(report_id)?;
        if report.status != ReportStatus::Final {
            return Err(EngineError::StateTransition {
                entity: "expense_report".to_string(),
                operation: "settle from".to_string(),
                current: report.status.to_string(),
            });
        }
        if report.advance_id != Some(advance_id) {
            return Err(EngineError::validation(
                "report_id",
                format!("report {} does not cover advance {}", report.id, advance_id),
            ));
        }

        let advance = self.store.get_advance(advance_id)?;
        let actual_total = if advance.currency.is_base() {
            report.total_amount_sar
        } else {
            round_money(report.total_amount_sar / self.config.exchange_rate(advance.currency))
        };
        self.settle(advance_id, actual_total, actor)
    }

    /// Creates a draft expense report rolling up claims for a trip.
    pub fn create_report(
        &self,
        travel_request_id: Uuid,
        advance_id: Option<Uuid>,
        claim_ids: Vec<Uuid>,
    ) -> EngineResult<ExpenseReport> {
        if claim_ids.is_empty() {
            return Err(EngineError::validation(
                "claim_ids",
                "a report requires at least one claim",
            ));
        }
        self.store.get_travel_request(travel_request_id)?;
        if let Some(advance_id) = advance_id {
            self.store.get_advance(advance_id)?;
        }

        let report = ExpenseReport {
            id: Uuid::new_v4(),
            travel_request_id,
            advance_id,
            claim_ids: claim_ids.clone(),
            total_amount_sar: self.sum_claim_totals(&claim_ids)?,
            status: ReportStatus::Draft,
        };
        self.store.insert_report(report.clone())?;
        info!(report_id = %report.id, total = %report.total_amount_sar, "Report created");
        Ok(report)
    }

    /// Finalizes a draft report, freezing its total.
    ///
    /// Every referenced claim must be approved; the total is recomputed
    /// from the claims' lines at this point, never carried forward.
    pub fn finalize_report(&self, report_id: Uuid, actor: &str) -> EngineResult<ExpenseReport> {
        let mut report = self.store.get_report(report_id)?;
        if report.status != ReportStatus::Draft {
            return Err(EngineError::StateTransition {
                entity: "expense_report".to_string(),
                operation: "finalize".to_string(),
                current: report.status.to_string(),
            });
        }
        for claim_id in &report.claim_ids {
            let claim = self.store.get_claim(*claim_id)?;
            if claim.status != ClaimStatus::Approved {
                return Err(EngineError::validation(
                    "claim_ids",
                    format!("claim {} is {}, not approved", claim.id, claim.status),
                ));
            }
        }

        report.total_amount_sar = self.sum_claim_totals(&report.claim_ids)?;
        report.status = ReportStatus::Final;
        self.store
            .update_report_if(ReportStatus::Draft, report.clone())?;

        info!(report_id = %report.id, total = %report.total_amount_sar, "Report finalized");
        self.notify(TransitionNotice {
            entity_type: "expense_report",
            entity_id: report.id,
            new_state: report.status.to_string(),
            actor: actor.to_string(),
            amount: Some(report.total_amount_sar),
            balance: None,
        });
        Ok(report)
    }

    /// Fetches a report for reading.
    ///
    /// Draft totals are recomputed from the referenced claims' current
    /// lines on every read; a final report's frozen total is returned
    /// as stored.
    pub fn get_report(&self, report_id: Uuid) -> EngineResult<ExpenseReport> {
        let mut report = self.store.get_report(report_id)?;
        if report.status == ReportStatus::Draft {
            report.total_amount_sar = self.sum_claim_totals(&report.claim_ids)?;
        }
        Ok(report)
    }

    /// Sums the referenced claims' totals, recomputed from their lines.
    fn sum_claim_totals(&self, claim_ids: &[Uuid]) -> EngineResult<Decimal> {
        let mut total = Decimal::ZERO;
        for claim_id in claim_ids {
            let claim = self.store.get_claim(*claim_id)?;
            total += recompute_totals(&claim.lines, &self.config).total_amount_sar;
        }
        Ok(round_money(total))
    }

    /// The advance principal expressed in the base currency, for display.
    pub fn amount_in_base(&self, advance: &TravelAdvance) -> Decimal {
        to_base_currency(advance.amount, advance.currency, &self.config).base_amount
    }

    /// The finance configuration the manager computes against.
    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }
}
