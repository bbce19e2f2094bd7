//! Configuration loading and management for the engine.
//!
//! This module provides functionality to load the finance configuration
//! from YAML files: the exchange-rate table, the VAT rate, and the
//! per-category policy ceilings.
//!
//! # Example
//!
//! ```no_run
//! use advance_engine::config::ConfigLoader;
//! use advance_engine::models::Currency;
//!
//! let loader = ConfigLoader::load("./config/finance").unwrap();
//! println!("USD rate: {}", loader.config().exchange_rate(Currency::USD));
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{FinanceConfig, PolicyConfig, RatesConfig};
