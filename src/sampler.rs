//! Periodic process-memory sampler.
//!
//! A background task snapshots process and system memory on a fixed interval
//! and feeds each sub-measurement through the same recording path as every
//! other metric. The derived system usage percentage gets its own warning
//! check, independent of the per-metric threshold table.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use sysinfo::{Pid, System};
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::config::SamplerConfig;
use crate::logging::EventLog;
use crate::metrics::{MemoryUsage, Metric, MetricUnit, MetricsRegistry};

const MB: f64 = 1024.0 * 1024.0;

/// Background memory sampler with an idempotent `start`/`stop` lifecycle.
pub struct MemorySampler {
    registry: Arc<MetricsRegistry>,
    log: Arc<dyn EventLog>,
    config: SamplerConfig,
    system: Arc<Mutex<System>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl MemorySampler {
    /// Create a sampler in the stopped state.
    pub fn new(
        registry: Arc<MetricsRegistry>,
        log: Arc<dyn EventLog>,
        config: SamplerConfig,
    ) -> Self {
        Self {
            registry,
            log,
            config,
            system: Arc::new(Mutex::new(System::new_all())),
            shutdown: Mutex::new(None),
        }
    }

    /// Start sampling on the given interval.
    ///
    /// A no-op while already running; only one tick loop ever exists.
    pub fn start(&self, interval: Duration) {
        let mut slot = self.shutdown.lock();
        if slot.is_some() {
            debug!("memory sampler already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        *slot = Some(shutdown_tx);

        let registry = self.registry.clone();
        let log = self.log.clone();
        let system = self.system.clone();
        let warn_percent = self.config.memory_warn_percent;

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("memory sampler received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        Self::sample(&system, &registry, log.as_ref(), warn_percent);
                    }
                }
            }
        });
    }

    /// Stop the tick loop.
    ///
    /// Safe to call while stopped. No sample begins after this returns,
    /// bounded by at most one already in-flight tick.
    pub fn stop(&self) {
        if let Some(shutdown_tx) = self.shutdown.lock().take() {
            let _ = shutdown_tx.send(());
        }
    }

    /// Whether the tick loop is currently active.
    pub fn is_running(&self) -> bool {
        self.shutdown.lock().is_some()
    }

    /// Take a memory reading on demand, without recording anything.
    ///
    /// Works whether or not the sampler is running; returns zeroed fields if
    /// the current process cannot be resolved.
    pub fn current_usage(&self) -> MemoryUsage {
        let mut system = self.system.lock();
        Self::read_usage(&mut system).unwrap_or_default()
    }

    /// One sampling pass: read memory, record the sub-measurements, check
    /// the derived usage percentage.
    fn sample(
        system: &Mutex<System>,
        registry: &MetricsRegistry,
        log: &dyn EventLog,
        warn_percent: f64,
    ) {
        let usage = {
            let mut system = system.lock();
            Self::read_usage(&mut system)
        };

        let Some(usage) = usage else {
            // Keep ticking; a failed reading is a warning, not a shutdown.
            log.warn(
                "memory sampler could not resolve the current process",
                json!({ "pid": std::process::id() }),
            );
            return;
        };

        for (name, value) in [
            ("memory_resident", usage.resident_mb),
            ("memory_virtual", usage.virtual_mb),
            ("memory_system_used", usage.system_used_mb()),
        ] {
            registry.record(
                Metric::new(name, value, MetricUnit::Bytes).with_tag("type", "memory"),
            );
        }

        // Derived reading; bypasses the per-metric threshold table.
        if usage.used_percent > warn_percent {
            log.warn(
                "high memory usage",
                json!({
                    "used_percent": usage.used_percent,
                    "threshold_percent": warn_percent,
                    "resident_mb": usage.resident_mb,
                    "system_available_mb": usage.system_available_mb,
                }),
            );
        }
    }

    fn read_usage(system: &mut System) -> Option<MemoryUsage> {
        system.refresh_all();

        let pid = Pid::from_u32(std::process::id());
        let process = system.process(pid)?;

        let system_total_mb = system.total_memory() as f64 / MB;
        let system_available_mb = system.available_memory() as f64 / MB;
        let used_percent = if system_total_mb > 0.0 {
            (system_total_mb - system_available_mb) / system_total_mb * 100.0
        } else {
            0.0
        };

        Some(MemoryUsage {
            resident_mb: process.memory() as f64 / MB,
            virtual_mb: process.virtual_memory() as f64 / MB,
            system_total_mb,
            system_available_mb,
            used_percent,
        })
    }
}
