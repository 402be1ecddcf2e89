//! Logging collaborator boundary.
//!
//! The monitoring core does not format or store log output itself; it emits
//! structured events through the three-method [`EventLog`] interface.
//! [`TracingLog`] is the production implementation and forwards to the
//! `tracing` macros; [`BufferedLog`] captures events in memory so alert side
//! effects can be asserted deterministically.

use std::sync::Once;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// The structured logger interface consumed by the monitoring core.
pub trait EventLog: Send + Sync {
    /// Log an informational event.
    fn info(&self, message: &str, context: Value);
    /// Log a warning (threshold breaches, sampler hiccups).
    fn warn(&self, message: &str, context: Value);
    /// Log an error.
    fn error(&self, message: &str, context: Value);
}

/// Default [`EventLog`] implementation backed by the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn info(&self, message: &str, context: Value) {
        tracing::info!(context = %context, "{}", message);
    }

    fn warn(&self, message: &str, context: Value) {
        tracing::warn!(context = %context, "{}", message);
    }

    fn error(&self, message: &str, context: Value) {
        tracing::error!(context = %context, "{}", message);
    }
}

/// Severity of a captured [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Warning.
    Warn,
    /// Error.
    Error,
}

/// A single event captured by [`BufferedLog`].
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Event severity.
    pub level: LogLevel,
    /// Event message.
    pub message: String,
    /// Structured context attached to the event.
    pub context: Value,
}

/// An in-memory [`EventLog`] that records every event it receives.
#[derive(Debug, Default)]
pub struct BufferedLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured event, in arrival order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Snapshot of captured warnings only.
    pub fn warnings(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == LogLevel::Warn)
            .cloned()
            .collect()
    }

    /// Discard all captured events.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn push(&self, level: LogLevel, message: &str, context: Value) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
            context,
        });
    }
}

impl EventLog for BufferedLog {
    fn info(&self, message: &str, context: Value) {
        self.push(LogLevel::Info, message, context);
    }

    fn warn(&self, message: &str, context: Value) {
        self.push(LogLevel::Warn, message, context);
    }

    fn error(&self, message: &str, context: Value) {
        self.push(LogLevel::Error, message, context);
    }
}

/// Logging configuration options.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: Level,
    /// Whether to include source code locations.
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            source_location: false,
        }
    }
}

/// Initialize the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup_logging(config: LogConfig) -> std::result::Result<(), String> {
    let mut result = Ok(());

    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(config.level.into());

        result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .try_init()
            .map_err(|e| format!("Failed to set global subscriber: {}", e));
    });

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_initialization() {
        let config = LogConfig::default();
        assert!(setup_logging(config).is_ok());

        // Second call is a no-op rather than an error.
        assert!(setup_logging(LogConfig::default()).is_ok());
    }

    #[test]
    fn test_buffered_log_capture() {
        let log = BufferedLog::new();
        log.info("started", json!({}));
        log.warn("slow query", json!({ "metric": "database_query", "value": 150.0 }));
        log.error("read failed", json!({ "reason": "process not found" }));

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].level, LogLevel::Warn);
        assert_eq!(entries[1].message, "slow query");
        assert_eq!(entries[1].context["metric"], "database_query");

        let warnings = log.warnings();
        assert_eq!(warnings.len(), 1);

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_tracing_log_does_not_panic() {
        let log = TracingLog;
        log.info("info", json!({ "k": "v" }));
        log.warn("warn", json!({}));
        log.error("error", json!(null));
    }
}
