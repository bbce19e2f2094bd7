//! Calculation logic for the Travel Advance & Expense Settlement Engine.
//!
//! This module contains the pure calculation leaves: currency conversion to
//! the base currency, VAT extraction from inclusive amounts, policy-ceiling
//! checks, per-line derivation composing the three, and the shared monetary
//! rounding rule.

mod currency;
mod line_derivation;
mod policy;
mod rounding;
mod vat;

pub use currency::{ConversionResult, to_base_currency};
pub use line_derivation::{LineDerivation, derive_line};
pub use policy::{PolicyCheck, check_policy};
pub use rounding::round_money;
pub use vat::{VatSplit, split_vat};
