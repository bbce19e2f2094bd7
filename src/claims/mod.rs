//! The Expense Claim Aggregator.
//!
//! Owns a claim's line collection and keeps the cached totals consistent:
//! every mutation runs the single recompute function over the current
//! lines, so the stored totals can never drift from their sources.

mod aggregator;

pub use aggregator::{
    ClaimTotals, add_line, add_per_diem, decide, ensure_deletable, new_claim, recompute_totals,
    remove_line, submit, update_line,
};
