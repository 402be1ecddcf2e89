//! The monitor facade: a single process-wide entry point wiring the
//! registry, timers, wrappers, and the memory sampler together.

mod builder;
#[allow(clippy::module_inception)]
mod monitor;

pub use builder::MonitorBuilder;
pub use monitor::PerformanceMonitor;
