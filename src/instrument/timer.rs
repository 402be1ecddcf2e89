use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::{Metric, MetricUnit, MetricsRegistry};

/// Measures elapsed wall-clock time for one bounded span and records a
/// millisecond metric when it ends.
///
/// The start instant comes from the monotonic clock, so wall-clock
/// adjustments cannot skew measurements. `end` is idempotent: the first call
/// records exactly one metric and freezes the duration; later calls return
/// that duration and record nothing. A timer dropped without `end` records
/// nothing.
pub struct Timer {
    registry: Arc<MetricsRegistry>,
    name: String,
    tags: HashMap<String, String>,
    start: Instant,
    finished: Option<Duration>,
}

impl Timer {
    /// Start a timer for the named metric.
    pub fn new(registry: Arc<MetricsRegistry>, name: impl Into<String>) -> Self {
        Self::with_tags(registry, name, HashMap::new())
    }

    /// Start a timer carrying dimensional tags.
    pub fn with_tags(
        registry: Arc<MetricsRegistry>,
        name: impl Into<String>,
        tags: HashMap<String, String>,
    ) -> Self {
        Self {
            registry,
            name: name.into(),
            tags,
            start: Instant::now(),
            finished: None,
        }
    }

    /// Stop the timer, record its metric, and return the elapsed duration.
    pub fn end(&mut self) -> Duration {
        if let Some(duration) = self.finished {
            return duration;
        }

        let elapsed = self.start.elapsed();
        let metric = Metric::new(
            self.name.as_str(),
            elapsed.as_secs_f64() * 1000.0,
            MetricUnit::Millis,
        )
        .with_tags(self.tags.clone());
        self.registry.record(metric);

        self.finished = Some(elapsed);
        elapsed
    }

    /// Elapsed time so far, without ending the timer.
    ///
    /// After `end`, keeps reporting the frozen duration.
    pub fn current_duration(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.start.elapsed())
    }

    /// The metric name this timer records under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::BufferedLog;
    use crate::metrics::ThresholdTable;

    fn test_registry() -> Arc<MetricsRegistry> {
        Arc::new(MetricsRegistry::new(
            100,
            ThresholdTable::empty(),
            Arc::new(BufferedLog::new()),
        ))
    }

    #[test]
    fn test_end_records_one_metric() {
        let registry = test_registry();
        let mut timer = Timer::with_tags(
            registry.clone(),
            "database_query",
            HashMap::from([("table".to_string(), "users".to_string())]),
        );

        std::thread::sleep(Duration::from_millis(5));
        let duration = timer.end();
        assert!(duration >= Duration::from_millis(5));

        let series = registry.series("database_query");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].unit, MetricUnit::Millis);
        assert!(series[0].value >= 5.0);
        assert_eq!(series[0].tags.get("table"), Some(&"users".to_string()));
    }

    #[test]
    fn test_double_end_is_idempotent() {
        let registry = test_registry();
        let mut timer = Timer::new(registry.clone(), "op");

        let first = timer.end();
        std::thread::sleep(Duration::from_millis(5));
        let second = timer.end();

        assert_eq!(first, second);
        assert_eq!(registry.len("op"), 1);
    }

    #[test]
    fn test_current_duration_does_not_record() {
        let registry = test_registry();
        let timer = Timer::new(registry.clone(), "op");

        let d1 = timer.current_duration();
        std::thread::sleep(Duration::from_millis(2));
        let d2 = timer.current_duration();

        assert!(d2 >= d1);
        assert_eq!(registry.len("op"), 0);
    }

    #[test]
    fn test_drop_without_end_records_nothing() {
        let registry = test_registry();
        {
            let _timer = Timer::new(registry.clone(), "abandoned");
        }
        assert_eq!(registry.len("abandoned"), 0);
    }

    #[test]
    fn test_current_duration_frozen_after_end() {
        let registry = test_registry();
        let mut timer = Timer::new(registry, "op");

        let ended = timer.end();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(timer.current_duration(), ended);
    }
}
