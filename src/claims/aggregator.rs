//! Expense claim aggregation.
//!
//! All line mutations funnel through [`apply_totals`]: the cached
//! `total_amount_sar`, `vat_total_sar`, and `lines_count` fields are a
//! materialized view over the lines, written only from a full recompute and
//! never adjusted piecemeal. The violation count is advisory and surfaced
//! per recompute rather than persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::calculation::{derive_line, round_money};
use crate::config::FinanceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClaimStatus, Currency, ExpenseCategory, ExpenseClaim, ExpenseLine, LinePatch};
use crate::store::ApprovalPolicy;

/// Derived claim-level totals, recomputed from scratch on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimTotals {
    /// Sum of every line's base-currency amount, rounded to 2 dp after
    /// summation.
    pub total_amount_sar: Decimal,
    /// Sum of every line's extracted VAT.
    pub vat_total_sar: Decimal,
    /// Number of lines.
    pub lines_count: usize,
    /// Number of lines exceeding their category ceiling. Advisory only.
    pub violation_count: usize,
}

/// Recomputes the claim totals from the current lines.
///
/// This is the only way totals are produced: each line is converted to the
/// base currency (rounded per line), VAT is extracted per line, and the
/// sums are rounded once more at the end.
pub fn recompute_totals(lines: &[ExpenseLine], config: &FinanceConfig) -> ClaimTotals {
    let mut total = Decimal::ZERO;
    let mut vat_total = Decimal::ZERO;
    let mut violation_count = 0;

    for line in lines {
        let derived = derive_line(line, config);
        total += derived.base_amount;
        vat_total += derived.vat;
        if derived.policy.violation {
            violation_count += 1;
        }
    }

    ClaimTotals {
        total_amount_sar: round_money(total),
        vat_total_sar: round_money(vat_total),
        lines_count: lines.len(),
        violation_count,
    }
}

/// Writes freshly recomputed totals into the claim's cached fields.
fn apply_totals(claim: &mut ExpenseClaim, config: &FinanceConfig) -> ClaimTotals {
    let totals = recompute_totals(&claim.lines, config);
    claim.total_amount_sar = totals.total_amount_sar;
    claim.vat_total_sar = totals.vat_total_sar;
    claim.lines_count = totals.lines_count;
    totals
}

/// Rejects mutation attempts on non-draft claims.
fn ensure_draft(claim: &ExpenseClaim, operation: &str) -> EngineResult<()> {
    if claim.status != ClaimStatus::Draft {
        return Err(EngineError::StateTransition {
            entity: "expense_claim".to_string(),
            operation: operation.to_string(),
            current: claim.status.to_string(),
        });
    }
    Ok(())
}

/// Checks a line index against the claim's line collection.
fn check_index(claim: &ExpenseClaim, index: usize) -> EngineResult<()> {
    if index >= claim.lines.len() {
        return Err(EngineError::validation(
            "index",
            format!(
                "line index {} out of range for claim with {} lines",
                index,
                claim.lines.len()
            ),
        ));
    }
    Ok(())
}

/// Creates a new draft claim with its initial lines.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `lines` is empty or any line
/// fails its own validation.
pub fn new_claim(
    employee_id: impl Into<String>,
    claim_date: NaiveDate,
    description: impl Into<String>,
    lines: Vec<ExpenseLine>,
    config: &FinanceConfig,
) -> EngineResult<ExpenseClaim> {
    if lines.is_empty() {
        return Err(EngineError::validation(
            "lines",
            "a claim requires at least one expense line",
        ));
    }
    for line in &lines {
        line.validate()?;
    }

    let mut claim = ExpenseClaim {
        id: Uuid::new_v4(),
        employee_id: employee_id.into(),
        claim_date,
        description: description.into(),
        lines,
        total_amount_sar: Decimal::ZERO,
        vat_total_sar: Decimal::ZERO,
        lines_count: 0,
        status: ClaimStatus::Draft,
    };
    apply_totals(&mut claim, config);
    Ok(claim)
}

/// Appends a line to a draft claim and recomputes the totals.
pub fn add_line(
    claim: &mut ExpenseClaim,
    line: ExpenseLine,
    config: &FinanceConfig,
) -> EngineResult<ClaimTotals> {
    ensure_draft(claim, "add a line to")?;
    line.validate()?;
    claim.lines.push(line);
    Ok(apply_totals(claim, config))
}

/// Removes the line at `index` from a draft claim and recomputes the totals.
pub fn remove_line(
    claim: &mut ExpenseClaim,
    index: usize,
    config: &FinanceConfig,
) -> EngineResult<ClaimTotals> {
    ensure_draft(claim, "remove a line from")?;
    check_index(claim, index)?;
    claim.lines.remove(index);
    Ok(apply_totals(claim, config))
}

/// Patches the line at `index` on a draft claim and recomputes the totals.
///
/// The patched line is validated as a whole before it replaces the
/// original, so a partial update cannot produce an invalid line.
pub fn update_line(
    claim: &mut ExpenseClaim,
    index: usize,
    patch: &LinePatch,
    config: &FinanceConfig,
) -> EngineResult<ClaimTotals> {
    ensure_draft(claim, "update a line of")?;
    check_index(claim, index)?;
    let patched = patch.apply(&claim.lines[index]);
    patched.validate()?;
    claim.lines[index] = patched;
    Ok(apply_totals(claim, config))
}

/// Appends a per-diem line: `days × daily_rate` in the base currency,
/// never VAT-inclusive, dated on the claim date.
pub fn add_per_diem(
    claim: &mut ExpenseClaim,
    days: u32,
    daily_rate: Decimal,
    config: &FinanceConfig,
) -> EngineResult<ClaimTotals> {
    ensure_draft(claim, "add per diem to")?;
    if days == 0 {
        return Err(EngineError::validation("days", "must be at least 1"));
    }
    if daily_rate <= Decimal::ZERO {
        return Err(EngineError::validation(
            "daily_rate",
            "must be greater than zero",
        ));
    }

    let line = ExpenseLine {
        expense_date: claim.claim_date,
        category: ExpenseCategory::PerDiem,
        vendor: "Per Diem".to_string(),
        description: format!("{} days at {} {}/day", days, daily_rate, Currency::BASE),
        currency: Currency::BASE,
        amount: Decimal::from(days) * daily_rate,
        vat_included: false,
        receipt_url: None,
    };
    claim.lines.push(line);
    Ok(apply_totals(claim, config))
}

/// Submits a draft claim, freezing its lines.
///
/// # Errors
///
/// Returns [`EngineError::StateTransition`] if the claim is not draft, and
/// [`EngineError::Validation`] if it has no lines.
pub fn submit(claim: &mut ExpenseClaim) -> EngineResult<()> {
    ensure_draft(claim, "submit")?;
    if claim.lines.is_empty() {
        return Err(EngineError::validation(
            "lines",
            "cannot submit a claim with zero lines",
        ));
    }
    claim.status = ClaimStatus::Submitted;
    Ok(())
}

/// Decides a submitted claim, gated on the approval capability predicate.
pub fn decide(
    claim: &mut ExpenseClaim,
    approved: bool,
    policy: &dyn ApprovalPolicy,
    role: &str,
) -> EngineResult<()> {
    if !policy.can_approve(role) {
        return Err(EngineError::validation(
            "role",
            format!("role '{}' cannot approve expense claims", role),
        ));
    }
    if claim.status != ClaimStatus::Submitted {
        return Err(EngineError::StateTransition {
            entity: "expense_claim".to_string(),
            operation: "decide".to_string(),
            current: claim.status.to_string(),
        });
    }
    claim.status = if approved {
        ClaimStatus::Approved
    } else {
        ClaimStatus::Rejected
    };
    Ok(())
}

/// Checks that a claim may be deleted. Only draft claims are deletable.
pub fn ensure_deletable(claim: &ExpenseClaim) -> EngineResult<()> {
    ensure_draft(claim, "delete")
}
