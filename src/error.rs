//! Error types for the monitoring core.
//!
//! The hot path (`record`, `Timer::end`, threshold checks, the wrappers)
//! never returns errors: observability code must not crash the operation it
//! instruments. Errors here surface only from configuration validation and
//! sampler setup.

use std::error::Error as StdError;
use std::fmt;

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors raised outside the instrumentation hot path.
#[derive(Debug)]
pub enum MonitorError {
    /// A configuration value failed validation.
    Configuration {
        /// Human-readable description of the problem.
        message: String,
        /// The configuration parameter at fault.
        parameter: String,
    },
    /// The memory sampler could not be set up or read.
    Sampler {
        /// Human-readable description of the problem.
        message: String,
    },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Configuration { message, parameter } => {
                write!(f, "Configuration error for {}: {}", parameter, message)
            }
            MonitorError::Sampler { message } => {
                write!(f, "Sampler error: {}", message)
            }
        }
    }
}

impl StdError for MonitorError {}
