use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::stats::StatsSummary;

/// Unit of a recorded metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    /// Milliseconds of elapsed time.
    #[serde(rename = "ms")]
    Millis,
    /// A memory size (recorded in megabytes).
    #[serde(rename = "bytes")]
    Bytes,
    /// A plain count.
    #[serde(rename = "count")]
    Count,
    /// A percentage in 0..=100.
    #[serde(rename = "percentage")]
    Percent,
}

/// One immutable measurement.
///
/// Created once, when a timer ends or the sampler takes a reading, and owned
/// by the registry after [`crate::MetricsRegistry::record`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Metric identifier, e.g. `"database_query"`.
    pub name: String,

    /// Numeric magnitude, interpreted per `unit`.
    pub value: f64,

    /// Unit of `value`.
    pub unit: MetricUnit,

    /// Capture instant.
    pub timestamp: SystemTime,

    /// Dimensional context, e.g. `{operation, table}`.
    pub tags: HashMap<String, String>,
}

impl Metric {
    /// Create a metric stamped with the current wall-clock time.
    pub fn new(name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            timestamp: SystemTime::now(),
            tags: HashMap::new(),
        }
    }

    /// Attach a single tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replace the tag set.
    pub fn with_tags(mut self, tags: HashMap<String, String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A point-in-time memory reading, all sizes in megabytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Resident set size of this process.
    pub resident_mb: f64,

    /// Virtual memory size of this process.
    pub virtual_mb: f64,

    /// Total system memory.
    pub system_total_mb: f64,

    /// Memory currently available to the system.
    pub system_available_mb: f64,

    /// System memory usage as a percentage of the total.
    pub used_percent: f64,
}

impl MemoryUsage {
    /// System memory currently in use, in megabytes.
    pub fn system_used_mb(&self) -> f64 {
        (self.system_total_mb - self.system_available_mb).max(0.0)
    }
}

/// Aggregate report for health-check and reporting endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    /// One statistics summary per metric series currently holding data.
    pub metrics: HashMap<String, StatsSummary>,

    /// Current memory usage.
    pub memory: MemoryUsage,

    /// Seconds since the monitor was built.
    pub uptime_secs: u64,
}
