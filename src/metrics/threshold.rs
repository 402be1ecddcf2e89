//! Threshold alerting policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Metric;
use crate::config::DEFAULT_THRESHOLDS;

/// Static mapping from metric name to its alert limit.
///
/// Read-only at runtime. Names without a configured limit never breach
/// (thresholds are opt-in per metric name), and every breach alerts; there is
/// no hysteresis or deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdTable {
    limits: HashMap<String, f64>,
}

impl Default for ThresholdTable {
    /// The standard limits: `database_query` 100ms, `api_response` 500ms,
    /// `cache_operation` 50ms, `external_api` 2000ms.
    fn default() -> Self {
        Self {
            limits: DEFAULT_THRESHOLDS
                .iter()
                .map(|(name, limit)| (name.to_string(), *limit))
                .collect(),
        }
    }
}

impl ThresholdTable {
    /// A table with no limits configured.
    pub fn empty() -> Self {
        Self {
            limits: HashMap::new(),
        }
    }

    /// Build a table from an explicit name → limit mapping.
    pub fn from_limits(limits: HashMap<String, f64>) -> Self {
        Self { limits }
    }

    /// Add or replace one limit.
    pub fn with_limit(mut self, name: impl Into<String>, limit: f64) -> Self {
        self.limits.insert(name.into(), limit);
        self
    }

    /// The configured limit for a metric name, if any.
    pub fn limit(&self, name: &str) -> Option<f64> {
        self.limits.get(name).copied()
    }

    /// Check a metric against its limit.
    ///
    /// Returns `Some(limit)` when the metric's value strictly exceeds its
    /// configured limit, `None` otherwise.
    pub fn check(&self, metric: &Metric) -> Option<f64> {
        match self.limits.get(&metric.name) {
            Some(&limit) if metric.value > limit => Some(limit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::MetricUnit;

    #[test]
    fn test_breach_detection() {
        let table = ThresholdTable::default();

        let slow = Metric::new("database_query", 150.0, MetricUnit::Millis);
        assert_eq!(table.check(&slow), Some(100.0));

        let fast = Metric::new("database_query", 50.0, MetricUnit::Millis);
        assert_eq!(table.check(&fast), None);
    }

    #[test]
    fn test_exact_limit_does_not_breach() {
        let table = ThresholdTable::default();
        let at_limit = Metric::new("database_query", 100.0, MetricUnit::Millis);
        assert_eq!(table.check(&at_limit), None);
    }

    #[test]
    fn test_unknown_names_never_breach() {
        let table = ThresholdTable::default();
        let metric = Metric::new("unheard_of", 1e12, MetricUnit::Count);
        assert_eq!(table.check(&metric), None);
    }

    #[test]
    fn test_with_limit_overrides() {
        let table = ThresholdTable::default().with_limit("database_query", 10.0);
        let metric = Metric::new("database_query", 50.0, MetricUnit::Millis);
        assert_eq!(table.check(&metric), Some(10.0));
    }

    #[test]
    fn test_default_limits() {
        let table = ThresholdTable::default();
        assert_eq!(table.limit("database_query"), Some(100.0));
        assert_eq!(table.limit("api_response"), Some(500.0));
        assert_eq!(table.limit("cache_operation"), Some(50.0));
        assert_eq!(table.limit("external_api"), Some(2000.0));
        assert_eq!(table.limit("memory_resident"), None);
    }
}
