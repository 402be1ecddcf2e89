//! perf-monitor - In-process performance metrics collection and alerting
//!
//! This crate records timed operations and resource-usage samples, retains a
//! bounded recent history per metric, computes percentile statistics on
//! demand, and raises warnings when configured thresholds are exceeded. It
//! gives operators visibility into database, API, cache, and external-call
//! latency, plus memory pressure, without an external metrics backend.
//!
//! # Example
//!
//! ```no_run
//! use perf_monitor::{Metric, MetricUnit, PerformanceMonitor};
//!
//! # async fn demo() -> Result<(), perf_monitor::MonitorError> {
//! let monitor = PerformanceMonitor::builder().build()?;
//! monitor.start_sampler();
//!
//! let _rows: Result<Vec<u8>, std::io::Error> = monitor
//!     .track_database_query("select", "users", || async { Ok(vec![]) })
//!     .await;
//!
//! monitor.record_metric(Metric::new("jobs_queued", 3.0, MetricUnit::Count));
//! let _summary = monitor.performance_summary();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Public modules
pub mod config;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod metrics;
pub mod monitor;
pub mod sampler;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-exports for the public API
pub use config::{MonitorConfig, SamplerConfig};
pub use error::{MonitorError, Result};
pub use instrument::{
    track_api_response, track_cache_operation, track_database_query, track_external_api, Timer,
};
pub use logging::{setup_logging, BufferedLog, EventLog, LogConfig, TracingLog};
pub use metrics::{
    summarize, MemoryUsage, Metric, MetricUnit, MetricsRegistry, PerformanceSummary,
    StatsSummary, ThresholdTable, DEFAULT_SERIES_CAPACITY,
};
pub use monitor::{MonitorBuilder, PerformanceMonitor};
pub use sampler::MemorySampler;
