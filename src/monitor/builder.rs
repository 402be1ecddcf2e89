use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::logging::{EventLog, TracingLog};
use crate::metrics::{MetricsRegistry, ThresholdTable};
use crate::sampler::MemorySampler;

use super::monitor::PerformanceMonitor;

/// Builder for constructing a [`PerformanceMonitor`] instance.
pub struct MonitorBuilder {
    config: MonitorConfig,
    log: Option<Arc<dyn EventLog>>,
}

impl MonitorBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
            log: None,
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log collaborator. Defaults to [`TracingLog`].
    pub fn with_logger(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Add or override one alert threshold.
    pub fn with_threshold(mut self, name: impl Into<String>, limit: f64) -> Self {
        self.config.thresholds.insert(name.into(), limit);
        self
    }

    /// Override the per-series capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Validate the configuration and build the monitor.
    pub fn build(self) -> Result<PerformanceMonitor> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        let log = self.log.unwrap_or_else(|| Arc::new(TracingLog));

        let registry = Arc::new(MetricsRegistry::new(
            config.capacity,
            ThresholdTable::from_limits(config.thresholds.clone()),
            log.clone(),
        ));

        let sampler = Arc::new(MemorySampler::new(
            registry.clone(),
            log.clone(),
            config.sampler.clone(),
        ));

        Ok(PerformanceMonitor::new(config, registry, sampler))
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::BufferedLog;
    use crate::metrics::{Metric, MetricUnit};

    #[test]
    fn test_build_with_defaults() {
        let monitor = MonitorBuilder::new().build();
        assert!(monitor.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MonitorBuilder::new().with_capacity(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_threshold_override_reaches_registry() {
        let log = Arc::new(BufferedLog::new());
        let monitor = MonitorBuilder::new()
            .with_logger(log.clone())
            .with_threshold("custom_op", 5.0)
            .build()
            .unwrap();

        monitor.record_metric(Metric::new("custom_op", 9.0, MetricUnit::Millis));
        assert_eq!(log.warnings().len(), 1);
    }
}
