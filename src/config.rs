//! Monitor configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Top-level configuration for a [`crate::PerformanceMonitor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Maximum number of samples retained per metric series.
    ///
    /// Once a series reaches this length, each new sample evicts the oldest
    /// one (strict FIFO).
    pub capacity: usize,

    /// Per-metric alert limits.
    ///
    /// A recorded value strictly greater than its limit emits one warning
    /// through the log collaborator. Names without a limit never alert.
    pub thresholds: HashMap<String, f64>,

    /// Background memory sampler settings.
    pub sampler: SamplerConfig,
}

/// Settings for the periodic memory sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Interval between memory samples.
    pub interval: Duration,

    /// System memory usage percentage above which a warning is emitted.
    ///
    /// This applies to the derived used-percent reading and does not go
    /// through the per-metric threshold table.
    pub memory_warn_percent: f64,
}

/// Default per-metric limits, in milliseconds.
pub(crate) const DEFAULT_THRESHOLDS: &[(&str, f64)] = &[
    ("database_query", 100.0),
    ("api_response", 500.0),
    ("cache_operation", 50.0),
    ("external_api", 2000.0),
];

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: crate::metrics::DEFAULT_SERIES_CAPACITY,
            thresholds: DEFAULT_THRESHOLDS
                .iter()
                .map(|(name, limit)| (name.to_string(), *limit))
                .collect(),
            sampler: SamplerConfig::default(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            memory_warn_percent: 80.0,
        }
    }
}

impl MonitorConfig {
    /// Validate the configuration, reporting the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(MonitorError::Configuration {
                message: "Series capacity must be greater than zero".to_string(),
                parameter: "capacity".to_string(),
            });
        }

        for (name, limit) in &self.thresholds {
            if !limit.is_finite() || *limit <= 0.0 {
                return Err(MonitorError::Configuration {
                    message: format!("Threshold for '{}' must be a positive finite number", name),
                    parameter: "thresholds".to_string(),
                });
            }
        }

        if self.sampler.interval.is_zero() {
            return Err(MonitorError::Configuration {
                message: "Sampler interval must be non-zero".to_string(),
                parameter: "sampler.interval".to_string(),
            });
        }

        if !(0.0..=100.0).contains(&self.sampler.memory_warn_percent)
            || self.sampler.memory_warn_percent == 0.0
        {
            return Err(MonitorError::Configuration {
                message: "Memory warning percentage must be in (0, 100]".to_string(),
                parameter: "sampler.memory_warn_percent".to_string(),
            });
        }

        Ok(())
    }
}
