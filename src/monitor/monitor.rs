use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::config::MonitorConfig;
use crate::instrument::{
    track_api_response, track_cache_operation, track_database_query, track_external_api, Timer,
};
use crate::metrics::{Metric, MetricsRegistry, PerformanceSummary, StatsSummary};
use crate::sampler::MemorySampler;

use super::builder::MonitorBuilder;

/// Main entry point for the monitoring library.
///
/// Constructed once at startup via [`MonitorBuilder`] and passed by handle
/// to every collaborator that records or reads metrics. All methods take
/// `&self`; the monitor is safe to share behind an `Arc`.
pub struct PerformanceMonitor {
    config: Arc<MonitorConfig>,
    registry: Arc<MetricsRegistry>,
    sampler: Arc<MemorySampler>,
    started_at: Instant,
}

impl PerformanceMonitor {
    /// Create a new monitor builder.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    pub(super) fn new(
        config: Arc<MonitorConfig>,
        registry: Arc<MetricsRegistry>,
        sampler: Arc<MemorySampler>,
    ) -> Self {
        Self {
            config,
            registry,
            sampler,
            started_at: Instant::now(),
        }
    }

    /// The underlying registry, for direct collaborator wiring.
    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    /// The memory sampler handle.
    pub fn sampler(&self) -> &Arc<MemorySampler> {
        &self.sampler
    }

    /// Record one metric through the registry.
    pub fn record_metric(&self, metric: Metric) {
        self.registry.record(metric);
    }

    /// Snapshot of the named series, oldest first.
    pub fn metrics(&self, name: &str) -> Vec<Metric> {
        self.registry.series(name)
    }

    /// Every metric name currently tracked.
    pub fn metric_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Snapshot of every tracked series, keyed by metric name.
    pub fn all_metrics(&self) -> HashMap<String, Vec<Metric>> {
        self.registry
            .names()
            .into_iter()
            .map(|name| {
                let series = self.registry.series(&name);
                (name, series)
            })
            .collect()
    }

    /// Summary statistics for one metric, `None` if it holds no data.
    pub fn metric_stats(&self, name: &str) -> Option<StatsSummary> {
        self.registry.stats(name)
    }

    /// Clear one named series, or every series when `name` is `None`.
    pub fn clear_metrics(&self, name: Option<&str>) {
        match name {
            Some(name) => self.registry.remove(name),
            None => self.registry.clear(),
        }
    }

    /// Start a timer recording under `name` when ended.
    pub fn timer(&self, name: impl Into<String>) -> Timer {
        Timer::new(self.registry.clone(), name)
    }

    /// Start a timer carrying dimensional tags.
    pub fn timer_with_tags(
        &self,
        name: impl Into<String>,
        tags: HashMap<String, String>,
    ) -> Timer {
        Timer::with_tags(self.registry.clone(), name, tags)
    }

    /// Time a database query; see [`crate::instrument::track_database_query`].
    pub async fn track_database_query<F, Fut, T, E>(
        &self,
        operation: &str,
        table: &str,
        op: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        track_database_query(&self.registry, operation, table, op).await
    }

    /// Time an API handler; see [`crate::instrument::track_api_response`].
    pub async fn track_api_response<F, Fut, T, E>(
        &self,
        endpoint: &str,
        method: &str,
        op: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        track_api_response(&self.registry, endpoint, method, op).await
    }

    /// Time a cache operation; see [`crate::instrument::track_cache_operation`].
    pub async fn track_cache_operation<F, Fut, T, E>(
        &self,
        operation: &str,
        key: &str,
        op: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        track_cache_operation(&self.registry, operation, key, op).await
    }

    /// Time an outbound service call; see [`crate::instrument::track_external_api`].
    pub async fn track_external_api<F, Fut, T, E>(
        &self,
        service: &str,
        endpoint: &str,
        method: &str,
        op: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        track_external_api(&self.registry, service, endpoint, method, op).await
    }

    /// Start the memory sampler on the configured interval.
    pub fn start_sampler(&self) {
        self.sampler.start(self.config.sampler.interval);
    }

    /// Stop the memory sampler.
    pub fn stop_sampler(&self) {
        self.sampler.stop();
    }

    /// Aggregate report for health-check endpoints: one statistics summary
    /// per tracked metric with data, current memory usage, and uptime.
    pub fn performance_summary(&self) -> PerformanceSummary {
        let mut metrics = HashMap::new();
        for name in self.registry.names() {
            if let Some(stats) = self.registry.stats(&name) {
                metrics.insert(name, stats);
            }
        }

        PerformanceSummary {
            metrics,
            memory: self.sampler.current_usage(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::BufferedLog;
    use crate::metrics::MetricUnit;
    use pretty_assertions::assert_eq;

    fn test_monitor() -> (PerformanceMonitor, Arc<BufferedLog>) {
        let log = Arc::new(BufferedLog::new());
        let monitor = PerformanceMonitor::builder()
            .with_logger(log.clone())
            .build()
            .unwrap();
        (monitor, log)
    }

    #[test]
    fn test_record_and_read_back() {
        let (monitor, _log) = test_monitor();

        monitor.record_metric(Metric::new("queue_depth", 7.0, MetricUnit::Count));
        monitor.record_metric(Metric::new("queue_depth", 9.0, MetricUnit::Count));

        let series = monitor.metrics("queue_depth");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, 7.0);

        let all = monitor.all_metrics();
        assert_eq!(all.len(), 1);
        assert_eq!(all["queue_depth"].len(), 2);

        let stats = monitor.metric_stats("queue_depth").unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_clear_metrics() {
        let (monitor, _log) = test_monitor();

        monitor.record_metric(Metric::new("a", 1.0, MetricUnit::Count));
        monitor.record_metric(Metric::new("b", 2.0, MetricUnit::Count));

        monitor.clear_metrics(Some("a"));
        assert!(monitor.metrics("a").is_empty());
        assert_eq!(monitor.metrics("b").len(), 1);

        monitor.clear_metrics(None);
        assert!(monitor.metric_names().is_empty());
    }

    #[tokio::test]
    async fn test_timer_through_facade() {
        let (monitor, _log) = test_monitor();

        let mut timer = monitor.timer("render");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        timer.end();

        assert_eq!(monitor.metrics("render").len(), 1);
    }

    #[tokio::test]
    async fn test_wrappers_through_facade() {
        let (monitor, log) = test_monitor();

        let ok: Result<&str, &str> = monitor
            .track_database_query("select", "accounts", || async { Ok("row") })
            .await;
        assert_eq!(ok, Ok("row"));
        assert_eq!(monitor.metrics("database_query").len(), 1);

        // Default thresholds are active through the facade.
        monitor.record_metric(Metric::new("database_query", 150.0, MetricUnit::Millis));
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn test_performance_summary_shape() {
        let (monitor, _log) = test_monitor();

        monitor.record_metric(Metric::new("database_query", 12.0, MetricUnit::Millis));
        monitor.record_metric(Metric::new("api_response", 80.0, MetricUnit::Millis));

        let summary = monitor.performance_summary();
        assert_eq!(summary.metrics.len(), 2);
        assert_eq!(summary.metrics["database_query"].count, 1);
        assert!(summary.memory.system_total_mb > 0.0);

        let encoded = serde_json::to_value(&summary).unwrap();
        assert!(encoded["metrics"]["api_response"]["p99"].is_number());
        assert!(encoded["uptime_secs"].is_number());
    }
}
