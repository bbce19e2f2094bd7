//! Data models for the Travel Advance & Expense Settlement Engine.
//!
//! This module contains the domain records: travel advances with their
//! approval trail, expense claims and their owned lines, travel requests
//! (read-only collaborator data), and trip-level expense reports.

mod advance;
mod claim;
mod currency;
mod line;
mod report;
mod travel_request;

pub use advance::{
    AdvanceStatus, ApprovalLevel, ApprovalRecord, PayoutMethod, RefundMethod, TravelAdvance,
};
pub use claim::{ClaimStatus, ExpenseClaim};
pub use currency::Currency;
pub use line::{ExpenseCategory, ExpenseLine, LinePatch};
pub use report::{ExpenseReport, ReportStatus};
pub use travel_request::{TravelRequest, TravelRequestStatus};
