//! Travel request model.
//!
//! Travel requests are owned by an external module; this engine only reads
//! them to verify that an advance is raised against an approved trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Approval status of a travel request, as persisted by the owning module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelRequestStatus {
    /// Raised but not yet decided.
    Pending,
    /// Approved; advances may be requested against it.
    Approved,
    /// Declined; no advances may be requested.
    Rejected,
}

impl fmt::Display for TravelRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelRequestStatus::Pending => "pending",
            TravelRequestStatus::Approved => "approved",
            TravelRequestStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A travel request record, read-only from this engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    /// System-assigned identifier.
    pub id: Uuid,
    /// The requesting employee's id.
    pub employee_id: String,
    /// The requesting employee's display name.
    pub employee_name: String,
    /// Trip destination.
    pub destination: String,
    /// First day of travel.
    pub start_date: NaiveDate,
    /// Last day of travel.
    pub end_date: NaiveDate,
    /// Approval status, decided by the owning module.
    pub status: TravelRequestStatus,
}
