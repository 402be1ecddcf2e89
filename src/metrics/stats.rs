//! Distribution statistics over a series snapshot.
//!
//! Percentiles use the nearest-rank method: the value at index
//! `count * N / 100` (integer floor) of the ascending-sorted values, with no
//! interpolation. Sorting makes this O(n log n), so it belongs on reporting
//! paths, not on every insert.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Summary statistics computed from one metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Number of samples.
    pub count: usize,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Median (nearest-rank).
    pub p50: f64,
    /// 95th percentile (nearest-rank).
    pub p95: f64,
    /// 99th percentile (nearest-rank).
    pub p99: f64,
}

/// Summarize a set of sample values.
///
/// Returns `None` for an empty input instead of producing NaN aggregates.
pub fn summarize(values: &[f64]) -> Option<StatsSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();

    // Nearest-rank index; always < count for percentiles below 100.
    let rank = |percentile: usize| sorted[count * percentile / 100];

    Some(StatsSummary {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        avg: sum / count as f64,
        p50: rank(50),
        p95: rank(95),
        p99: rank(99),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn test_single_value() {
        let stats = summarize(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
        assert_eq!(stats.avg, 42.0);
        assert_eq!(stats.p50, 42.0);
        assert_eq!(stats.p99, 42.0);
    }

    #[test]
    fn test_nearest_rank_reference_vector() {
        // 100 values: 10, 20, ..., 1000.
        let values: Vec<f64> = (1..=100).map(|i| (i * 10) as f64).collect();
        let stats = summarize(&values).unwrap();

        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 1000.0);
        assert_eq!(stats.avg, 505.0);
        // Index 50 of the sorted values.
        assert_eq!(stats.p50, 510.0);
        // Index 95.
        assert_eq!(stats.p95, 960.0);
        // Index 99.
        assert_eq!(stats.p99, 1000.0);
    }

    #[test]
    fn test_unsorted_input() {
        let stats = summarize(&[30.0, 10.0, 50.0, 20.0, 40.0]).unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.avg, 30.0);
        // count * 50 / 100 == 2 -> third smallest.
        assert_eq!(stats.p50, 30.0);
    }

    #[test]
    fn test_percentiles_are_ordered() {
        let values: Vec<f64> = (0..37).map(|i| (i * i) as f64).collect();
        let stats = summarize(&values).unwrap();
        assert!(stats.p50 <= stats.p95);
        assert!(stats.p95 <= stats.p99);
        assert!(stats.p99 <= stats.max);
    }
}
