//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the finance
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{FinanceConfig, PolicyConfig, RatesConfig};

/// Loads and provides access to the finance configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// validates them into a [`FinanceConfig`].
///
/// # Directory Structure
///
/// ```text
/// config/finance/
/// ├── rates.yaml   # VAT rate and exchange-rate table
/// └── policy.yaml  # Per-category spending ceilings
/// ```
///
/// # Example
///
/// ```no_run
/// use advance_engine::config::ConfigLoader;
/// use advance_engine::models::Currency;
///
/// let loader = ConfigLoader::load("./config/finance").unwrap();
/// let rate = loader.config().exchange_rate(Currency::USD);
/// println!("USD rate: {}", rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: FinanceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing (`ConfigNotFound`),
    /// contains invalid YAML (`ConfigParseError`), or fails the table
    /// invariants enforced by [`FinanceConfig::new`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rates = Self::load_yaml::<RatesConfig>(&path.join("rates.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;

        let config = FinanceConfig::new(rates, policy)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the validated finance configuration.
    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }
}
