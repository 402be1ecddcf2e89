//! Higher-order instrumentation wrappers.
//!
//! Each wrapper times a zero-argument async operation, records the duration
//! under its wrapper-specific metric name on success and failure alike, and
//! returns the operation's result unchanged. Errors are observed, never
//! swallowed or transformed.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::timer::Timer;
use crate::metrics::MetricsRegistry;

/// Time a database query under the `database_query` metric.
pub async fn track_database_query<F, Fut, T, E>(
    registry: &Arc<MetricsRegistry>,
    operation: &str,
    table: &str,
    op: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tags = HashMap::from([
        ("operation".to_string(), operation.to_string()),
        ("table".to_string(), table.to_string()),
    ]);
    track(registry, "database_query", tags, op).await
}

/// Time an API handler under the `api_response` metric.
pub async fn track_api_response<F, Fut, T, E>(
    registry: &Arc<MetricsRegistry>,
    endpoint: &str,
    method: &str,
    op: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tags = HashMap::from([
        ("endpoint".to_string(), endpoint.to_string()),
        ("method".to_string(), method.to_string()),
    ]);
    track(registry, "api_response", tags, op).await
}

/// Time a cache operation under the `cache_operation` metric.
pub async fn track_cache_operation<F, Fut, T, E>(
    registry: &Arc<MetricsRegistry>,
    operation: &str,
    key: &str,
    op: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tags = HashMap::from([
        ("operation".to_string(), operation.to_string()),
        ("key".to_string(), key.to_string()),
    ]);
    track(registry, "cache_operation", tags, op).await
}

/// Time an outbound service call under the `external_api` metric.
pub async fn track_external_api<F, Fut, T, E>(
    registry: &Arc<MetricsRegistry>,
    service: &str,
    endpoint: &str,
    method: &str,
    op: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tags = HashMap::from([
        ("service".to_string(), service.to_string()),
        ("endpoint".to_string(), endpoint.to_string()),
        ("method".to_string(), method.to_string()),
    ]);
    track(registry, "external_api", tags, op).await
}

async fn track<F, Fut, T, E>(
    registry: &Arc<MetricsRegistry>,
    metric: &str,
    tags: HashMap<String, String>,
    op: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut timer = Timer::with_tags(registry.clone(), metric, tags);
    let result = op().await;

    // Duration is recorded on both paths before the result propagates.
    let duration = timer.end();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    match &result {
        Ok(_) => debug!(metric, duration_ms, "tracked operation completed"),
        Err(_) => warn!(metric, duration_ms, "tracked operation failed"),
    }

    result
}
