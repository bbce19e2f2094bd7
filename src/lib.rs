//! Travel Advance Engine
//!
//! This crate provides functionality for managing travel advances through a
//! multi-step approval lifecycle, aggregating expense claims in multiple
//! currencies against finance policy, and settling advances against actual
//! spend.

#![warn(missing_docs)]

pub mod advance;
pub mod api;
pub mod calculation;
pub mod claims;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
