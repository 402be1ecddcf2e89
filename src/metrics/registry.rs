//! Process-wide metric store.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;

use super::stats::{summarize, StatsSummary};
use super::threshold::ThresholdTable;
use super::types::Metric;
use crate::logging::EventLog;

/// Bounded, ordered history of one metric name.
///
/// Length never exceeds the configured capacity; once full, each new sample
/// evicts exactly the oldest remaining entry.
#[derive(Debug)]
pub struct MetricSeries {
    samples: VecDeque<Metric>,
    capacity: usize,
}

impl MetricSeries {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    fn push(&mut self, metric: Metric) {
        self.samples.push_back(metric);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy of the retained samples, oldest first.
    pub fn snapshot(&self) -> Vec<Metric> {
        self.samples.iter().cloned().collect()
    }

    fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|m| m.value).collect()
    }
}

/// Store of recent metrics per name, with synchronous threshold alerting.
///
/// Each named series sits behind its own map shard, so concurrent recording
/// of unrelated metrics does not serialize. `record` is O(1) amortized and
/// infallible; a full series is not an error condition.
pub struct MetricsRegistry {
    series: DashMap<String, MetricSeries>,
    thresholds: ThresholdTable,
    log: Arc<dyn EventLog>,
    capacity: usize,
}

impl MetricsRegistry {
    /// Create a registry with the given per-series capacity, threshold
    /// policy, and log collaborator.
    pub fn new(capacity: usize, thresholds: ThresholdTable, log: Arc<dyn EventLog>) -> Self {
        Self {
            series: DashMap::new(),
            thresholds,
            log,
            capacity,
        }
    }

    /// Record one metric.
    ///
    /// Creates the named series on first use, appends the sample (evicting
    /// the oldest one at capacity), then evaluates the threshold policy for
    /// that name. On breach, one warning is emitted through the log
    /// collaborator before this method returns. The alert fires after the
    /// series guard is released so the collaborator may call back into the
    /// registry.
    pub fn record(&self, metric: Metric) {
        let breach = self
            .thresholds
            .check(&metric)
            .map(|limit| (metric.name.clone(), metric.value, metric.tags.clone(), limit));

        {
            let mut series = self
                .series
                .entry(metric.name.clone())
                .or_insert_with(|| MetricSeries::new(self.capacity));
            series.push(metric);
        }

        if let Some((name, value, tags, threshold)) = breach {
            self.log.warn(
                "metric threshold exceeded",
                json!({
                    "metric": name,
                    "value": value,
                    "threshold": threshold,
                    "tags": tags,
                }),
            );
        }
    }

    /// Snapshot of the named series, oldest sample first.
    ///
    /// An unknown name yields an empty vector.
    pub fn series(&self, name: &str) -> Vec<Metric> {
        self.series
            .get(name)
            .map(|s| s.snapshot())
            .unwrap_or_default()
    }

    /// Every metric name currently tracked.
    pub fn names(&self) -> Vec<String> {
        self.series.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of retained samples for a name.
    pub fn len(&self, name: &str) -> usize {
        self.series.get(name).map(|s| s.len()).unwrap_or(0)
    }

    /// Whether no series is currently tracked.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Summary statistics over the named series' current snapshot.
    ///
    /// Returns `None` for an empty or never-seen series.
    pub fn stats(&self, name: &str) -> Option<StatsSummary> {
        let values = self.series.get(name).map(|s| s.values())?;
        summarize(&values)
    }

    /// Drop one named series.
    pub fn remove(&self, name: &str) {
        self.series.remove(name);
    }

    /// Drop every series.
    pub fn clear(&self) {
        self.series.clear();
    }
}
