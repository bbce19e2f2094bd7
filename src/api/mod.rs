//! HTTP API module for the Travel Advance Engine.
//!
//! This module provides the REST API endpoints for the travel advance
//! lifecycle, expense claims, expense reports, and receipt storage.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AdvanceApprove, AdvanceCreate, AdvanceDisburse, AdvanceReject, AdvanceSettle, ClaimCreate,
    ClaimDecide, LineCreate, PerDiemCreate, ReportCreate, ReportFinalize, TravelRequestCreate,
};
pub use response::{AdvanceView, ApiError, ClaimView, ReceiptView};
pub use state::AppState;
