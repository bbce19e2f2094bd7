//! In-memory store implementations.
//!
//! `MemoryStore` backs the engine with mutex-guarded maps and an atomic
//! advance-number sequence. Conditional updates compare the persisted
//! status under the lock, which gives the single-writer-per-entity
//! semantics the lifecycle transitions rely on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdvanceStatus, ClaimStatus, ExpenseClaim, ExpenseReport, ReportStatus, TravelAdvance,
    TravelRequest,
};

use super::{EntityStore, ReceiptStore};

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    travel_requests: Mutex<HashMap<Uuid, TravelRequest>>,
    advances: Mutex<HashMap<Uuid, TravelAdvance>>,
    claims: Mutex<HashMap<Uuid, ExpenseClaim>>,
    reports: Mutex<HashMap<Uuid, ExpenseReport>>,
    advance_seq: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Acquires a map lock, surfacing poisoning as a dependency failure.
fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> EngineResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| EngineError::Dependency {
        dependency: "entity_store".to_string(),
        message: format!("{} map lock poisoned", name),
    })
}

impl EntityStore for MemoryStore {
    fn insert_travel_request(&self, request: TravelRequest) -> EngineResult<()> {
        lock(&self.travel_requests, "travel_requests")?.insert(request.id, request);
        Ok(())
    }

    fn get_travel_request(&self, id: Uuid) -> EngineResult<TravelRequest> {
        lock(&self.travel_requests, "travel_requests")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("travel_request", id))
    }

    fn next_advance_sequence(&self) -> u64 {
        self.advance_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn insert_advance(&self, advance: TravelAdvance) -> EngineResult<()> {
        lock(&self.advances, "advances")?.insert(advance.id, advance);
        Ok(())
    }

    fn get_advance(&self, id: Uuid) -> EngineResult<TravelAdvance> {
        lock(&self.advances, "advances")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("travel_advance", id))
    }

    fn list_advances(&self) -> EngineResult<Vec<TravelAdvance>> {
        Ok(lock(&self.advances, "advances")?.values().cloned().collect())
    }

    fn update_advance_if(
        &self,
        expected: AdvanceStatus,
        advance: TravelAdvance,
    ) -> EngineResult<()> {
        let mut advances = lock(&self.advances, "advances")?;
        let current = advances
            .get(&advance.id)
            .ok_or_else(|| EngineError::not_found("travel_advance", advance.id))?;
        if current.status != expected {
            return Err(EngineError::Conflict {
                entity: "travel_advance".to_string(),
                id: advance.id.to_string(),
                expected: expected.to_string(),
                found: current.status.to_string(),
            });
        }
        advances.insert(advance.id, advance);
        Ok(())
    }

    fn insert_claim(&self, claim: ExpenseClaim) -> EngineResult<()> {
        lock(&self.claims, "claims")?.insert(claim.id, claim);
        Ok(())
    }

    fn get_claim(&self, id: Uuid) -> EngineResult<ExpenseClaim> {
        lock(&self.claims, "claims")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("expense_claim", id))
    }

    fn update_claim_if(&self, expected: ClaimStatus, claim: ExpenseClaim) -> EngineResult<()> {
        let mut claims = lock(&self.claims, "claims")?;
        let current = claims
            .get(&claim.id)
            .ok_or_else(|| EngineError::not_found("expense_claim", claim.id))?;
        if current.status != expected {
            return Err(EngineError::Conflict {
                entity: "expense_claim".to_string(),
                id: claim.id.to_string(),
                expected: expected.to_string(),
                found: current.status.to_string(),
            });
        }
        claims.insert(claim.id, claim);
        Ok(())
    }

    fn delete_claim(&self, id: Uuid) -> EngineResult<()> {
        lock(&self.claims, "claims")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| EngineError::not_found("expense_claim", id))
    }

    fn insert_report(&self, report: ExpenseReport) -> EngineResult<()> {
        lock(&self.reports, "reports")?.insert(report.id, report);
        Ok(())
    }

    fn get_report(&self, id: Uuid) -> EngineResult<ExpenseReport> {
        lock(&self.reports, "reports")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("expense_report", id))
    }

    fn update_report_if(&self, expected: ReportStatus, report: ExpenseReport) -> EngineResult<()> {
        let mut reports = lock(&self.reports, "reports")?;
        let current = reports
            .get(&report.id)
            .ok_or_else(|| EngineError::not_found("expense_report", report.id))?;
        if current.status != expected {
            return Err(EngineError::Conflict {
                entity: "expense_report".to_string(),
                id: report.id.to_string(),
                expected: expected.to_string(),
                found: current.status.to_string(),
            });
        }
        reports.insert(report.id, report);
        Ok(())
    }
}

/// In-memory receipt store returning `mem://` reference URLs.
#[derive(Debug, Default)]
pub struct MemoryReceiptStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryReceiptStore {
    /// Creates an empty receipt store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReceiptStore for MemoryReceiptStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> EngineResult<String> {
        if filename.trim().is_empty() {
            return Err(EngineError::validation("filename", "must not be empty"));
        }
        if bytes.is_empty() {
            return Err(EngineError::validation("file", "must not be empty"));
        }
        let url = format!("mem://receipts/{}/{}", Uuid::new_v4(), filename);
        self.files
            .lock()
            .map_err(|_| EngineError::Dependency {
                dependency: "receipt_store".to_string(),
                message: "files map lock poisoned".to_string(),
            })?
            .insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}
