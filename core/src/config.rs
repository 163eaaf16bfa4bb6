//! Configuration for the comparison engine.
//!
//! `CompareConfig` centralizes behavioral knobs so callers and front ends
//! share one validated surface instead of scattered constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Upper bound on operations per input route; exceeding it aborts the
    /// run with `CompareError::LimitsExceeded`.
    pub max_route_operations: u32,
    /// Verify ascending strict key order at route construction time.
    pub validate_key_order: bool,
    /// Apply the baseline (MM) neutralization rule when a baseline route is
    /// supplied.
    pub enable_baseline_neutralization: bool,
    /// Attach content signatures to one-sided entries.
    pub include_signatures: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_route_operations: 100_000,
            validate_key_order: true,
            enable_baseline_neutralization: true,
            include_signatures: true,
        }
    }
}

impl CompareConfig {
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder {
            inner: CompareConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_route_operations == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "max_route_operations",
                value: 0,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveLimit { field: &'static str, value: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct CompareConfigBuilder {
    inner: CompareConfig,
}

impl CompareConfigBuilder {
    pub fn max_route_operations(mut self, value: u32) -> Self {
        self.inner.max_route_operations = value;
        self
    }

    pub fn validate_key_order(mut self, value: bool) -> Self {
        self.inner.validate_key_order = value;
        self
    }

    pub fn enable_baseline_neutralization(mut self, value: bool) -> Self {
        self.inner.enable_baseline_neutralization = value;
        self
    }

    pub fn include_signatures(mut self, value: bool) -> Self {
        self.inner.include_signatures = value;
        self
    }

    pub fn build(self) -> Result<CompareConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
