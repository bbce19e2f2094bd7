//! HTTP request handlers for the engine's API.
//!
//! This module contains the handler functions for the advance, claim,
//! report, and receipt endpoints, and the router wiring them up.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::claims;
use crate::error::EngineError;
use crate::models::{
    ClaimStatus, ExpenseClaim, ExpenseReport, LinePatch, TravelAdvance, TravelRequest,
};

use super::request::{
    AdvanceApprove, AdvanceCreate, AdvanceDisburse, AdvanceReject, AdvanceSettle, ClaimCreate,
    ClaimDecide, PerDiemCreate, ReportCreate, ReportFinalize, TravelRequestCreate,
};
use super::response::{AdvanceView, ApiError, ApiErrorResponse, ClaimView, ReceiptView};
use super::state::AppState;
use crate::advance::AdvanceRequest;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/travel-requests", post(create_travel_request))
        .route("/advances", get(list_advances).post(create_advance))
        .route("/advances/:id", get(get_advance))
        .route("/advances/:id/approve", post(approve_advance))
        .route("/advances/:id/reject", post(reject_advance))
        .route("/advances/:id/disburse", post(disburse_advance))
        .route("/advances/:id/settle", post(settle_advance))
        .route("/claims", post(create_claim))
        .route("/claims/:id", get(get_claim).delete(delete_claim))
        .route("/claims/:id/lines", post(add_claim_line))
        .route(
            "/claims/:id/lines/:index",
            axum::routing::patch(update_claim_line).delete(remove_claim_line),
        )
        .route("/claims/:id/per-diem", post(add_claim_per_diem))
        .route("/claims/:id/submit", post(submit_claim))
        .route("/claims/:id/decide", post(decide_claim))
        .route("/reports", post(create_report))
        .route("/reports/:id", get(get_report))
        .route("/reports/:id/finalize", post(finalize_report))
        .route("/receipts", post(upload_receipt))
        .with_state(state)
}

/// Unwraps a JSON payload, mapping axum rejections to API errors in the
/// same shape engine errors take.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse {
                status: axum::http::StatusCode::BAD_REQUEST,
                error,
            })
        }
    }
}

fn advance_view(state: &AppState, advance: TravelAdvance) -> AdvanceView {
    let amount_sar = state.manager().amount_in_base(&advance);
    AdvanceView {
        advance,
        amount_sar,
    }
}

fn claim_view(state: &AppState, claim: ExpenseClaim) -> ClaimView {
    let violation_count = claims::recompute_totals(&claim.lines, state.config()).violation_count;
    ClaimView {
        claim,
        violation_count,
    }
}

// ---------------------------------------------------------------------------
// Travel requests (seed surface for the external collaborator)
// ---------------------------------------------------------------------------

async fn create_travel_request(
    State(state): State<AppState>,
    payload: Result<Json<TravelRequestCreate>, JsonRejection>,
) -> Result<Json<TravelRequest>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let record = TravelRequest {
        id: Uuid::new_v4(),
        employee_id: request.employee_id,
        employee_name: request.employee_name,
        destination: request.destination,
        start_date: request.start_date,
        end_date: request.end_date,
        status: request.status,
    };
    state.store().insert_travel_request(record.clone())?;
    info!(travel_request_id = %record.id, status = %record.status, "Travel request seeded");
    Ok(Json(record))
}

// ---------------------------------------------------------------------------
// Advances
// ---------------------------------------------------------------------------

async fn create_advance(
    State(state): State<AppState>,
    payload: Result<Json<AdvanceCreate>, JsonRejection>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let advance = state.manager().request_advance(AdvanceRequest {
        travel_request_id: request.travel_request_id,
        amount: request.amount,
        currency: request.currency,
        payout_method: request.payout_method,
        purpose: request.purpose,
    })?;
    Ok(Json(advance_view(&state, advance)))
}

async fn get_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let advance = state.store().get_advance(id)?;
    Ok(Json(advance_view(&state, advance)))
}

async fn list_advances(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdvanceView>>, ApiErrorResponse> {
    let mut advances = state.store().list_advances()?;
    advances.sort_by(|a, b| a.advance_number.cmp(&b.advance_number));
    let views = advances
        .into_iter()
        .map(|advance| advance_view(&state, advance))
        .collect();
    Ok(Json(views))
}

async fn approve_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdvanceApprove>, JsonRejection>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let advance = state
        .manager()
        .approve(id, request.level, &request.approver, &request.role)?;
    Ok(Json(advance_view(&state, advance)))
}

async fn reject_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdvanceReject>, JsonRejection>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let advance = state.manager().reject(id, &request.reason, &request.actor)?;
    Ok(Json(advance_view(&state, advance)))
}

async fn disburse_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdvanceDisburse>, JsonRejection>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let advance = state.manager().disburse(id, &request.actor)?;
    Ok(Json(advance_view(&state, advance)))
}

async fn settle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdvanceSettle>, JsonRejection>,
) -> Result<Json<AdvanceView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let advance = match (request.actual_total, request.report_id) {
        (Some(actual_total), None) => state.manager().settle(id, actual_total, &request.actor)?,
        (None, Some(report_id)) => {
            state
                .manager()
                .settle_from_report(id, report_id, &request.actor)?
        }
        _ => {
            return Err(EngineError::validation(
                "actual_total",
                "provide exactly one of actual_total and report_id",
            )
            .into());
        }
    };
    Ok(Json(advance_view(&state, advance)))
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

async fn create_claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimCreate>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let claim = claims::new_claim(
        request.employee_id,
        request.claim_date,
        request.description,
        request.lines.into_iter().map(Into::into).collect(),
        state.config(),
    )?;
    state.store().insert_claim(claim.clone())?;
    info!(claim_id = %claim.id, total = %claim.total_amount_sar, "Claim created");
    Ok(Json(claim_view(&state, claim)))
}

async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let claim = state.store().get_claim(id)?;
    Ok(Json(claim_view(&state, claim)))
}

async fn delete_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiErrorResponse> {
    let claim = state.store().get_claim(id)?;
    claims::ensure_deletable(&claim)?;
    state.store().delete_claim(id)?;
    info!(claim_id = %id, "Claim deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn add_claim_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<super::request::LineCreate>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let mut claim = state.store().get_claim(id)?;
    claims::add_line(&mut claim, request.into(), state.config())?;
    state
        .store()
        .update_claim_if(ClaimStatus::Draft, claim.clone())?;
    Ok(Json(claim_view(&state, claim)))
}

async fn update_claim_line(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    payload: Result<Json<LinePatch>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let patch = parse_json(payload)?;
    let mut claim = state.store().get_claim(id)?;
    claims::update_line(&mut claim, index, &patch, state.config())?;
    state
        .store()
        .update_claim_if(ClaimStatus::Draft, claim.clone())?;
    Ok(Json(claim_view(&state, claim)))
}

async fn remove_claim_line(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let mut claim = state.store().get_claim(id)?;
    claims::remove_line(&mut claim, index, state.config())?;
    state
        .store()
        .update_claim_if(ClaimStatus::Draft, claim.clone())?;
    Ok(Json(claim_view(&state, claim)))
}

async fn add_claim_per_diem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PerDiemCreate>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let mut claim = state.store().get_claim(id)?;
    claims::add_per_diem(&mut claim, request.days, request.daily_rate, state.config())?;
    state
        .store()
        .update_claim_if(ClaimStatus::Draft, claim.clone())?;
    Ok(Json(claim_view(&state, claim)))
}

async fn submit_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let mut claim = state.store().get_claim(id)?;
    claims::submit(&mut claim)?;
    state
        .store()
        .update_claim_if(ClaimStatus::Draft, claim.clone())?;
    info!(claim_id = %claim.id, "Claim submitted");
    Ok(Json(claim_view(&state, claim)))
}

async fn decide_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ClaimDecide>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let mut claim = state.store().get_claim(id)?;
    claims::decide(&mut claim, request.approved, state.approvals(), &request.role)?;
    state
        .store()
        .update_claim_if(ClaimStatus::Submitted, claim.clone())?;
    info!(claim_id = %claim.id, status = %claim.status, "Claim decided");
    Ok(Json(claim_view(&state, claim)))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

async fn create_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportCreate>, JsonRejection>,
) -> Result<Json<ExpenseReport>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let report = state.manager().create_report(
        request.travel_request_id,
        request.advance_id,
        request.claim_ids,
    )?;
    Ok(Json(report))
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseReport>, ApiErrorResponse> {
    let report = state.manager().get_report(id)?;
    Ok(Json(report))
}

async fn finalize_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ReportFinalize>, JsonRejection>,
) -> Result<Json<ExpenseReport>, ApiErrorResponse> {
    let request = parse_json(payload)?;
    let report = state.manager().finalize_report(id, &request.actor)?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ReceiptParams {
    filename: String,
}

async fn upload_receipt(
    State(state): State<AppState>,
    Query(params): Query<ReceiptParams>,
    body: Bytes,
) -> Result<Json<ReceiptView>, ApiErrorResponse> {
    let url = state.receipts().store(&params.filename, &body)?;
    info!(filename = %params.filename, url = %url, "Receipt stored");
    Ok(Json(ReceiptView { url }))
}
