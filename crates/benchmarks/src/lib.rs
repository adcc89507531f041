//! Result and metrics types for nearest-neighbor benchmark adapters.
//!
//! Every adapter reports its run as a [`RunOutcome`]: either a flat
//! [`Metrics`] mapping or a [`MethodError`]. The harness records each
//! outcome as a [`BenchmarkResult`] and writes reports through [`io`].
//!
//! # Quick Start
//!
//! ```
//! use nnbench_benchmarks::{BenchmarkResult, Metrics, TimingResult};
//!
//! let metrics = Metrics::from(TimingResult::new(1.5, 2.25));
//! let result = BenchmarkResult::new("flann/allknn", metrics);
//! assert_eq!(result.metrics.runtime(), Some(3.75));
//! ```
//!
//! # Modules
//!
//! - [`metrics`] - Metric names, `Metrics` and `TimingResult`
//! - [`outcome`] - `MethodError` and the legacy sentinel codes
//! - [`result`] - The canonical `BenchmarkResult` struct
//! - [`io`] - I/O operations for reading/writing results
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod metrics;
pub mod outcome;
pub mod result;

pub use metrics::{Metrics, TimingResult};
pub use outcome::{MethodError, RunOutcome};
pub use result::{BenchmarkResult, RunStatus};

/// Count the failed runs in a result set.
pub fn failure_count(results: &[BenchmarkResult]) -> usize {
    results.iter().filter(|r| !r.is_success()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_count() {
        let results = vec![
            BenchmarkResult::new("a", Metrics::from(TimingResult::new(0.1, 0.2))),
            BenchmarkResult::failed(
                "b",
                &MethodError::ParseFailure {
                    reason: "wrong format".to_string(),
                },
            ),
        ];
        assert_eq!(failure_count(&results), 1);
    }

    #[test]
    fn test_benchmark_result_has_required_fields() {
        let result = BenchmarkResult::new("test", Metrics::new());
        assert_eq!(result.target_id, "test");
        assert!(result.metrics.is_empty());
        assert!(result.timestamp <= chrono::Utc::now());
    }
}
