//! Performance metrics collection: the metric model, the bounded per-name
//! registry, percentile statistics, and the threshold alerting policy.

mod registry;
mod stats;
mod threshold;
mod types;

pub use registry::{MetricSeries, MetricsRegistry};
pub use stats::{summarize, StatsSummary};
pub use threshold::ThresholdTable;
pub use types::{MemoryUsage, Metric, MetricUnit, PerformanceSummary};

/// Default number of samples retained per metric series.
pub const DEFAULT_SERIES_CAPACITY: usize = 1000;
