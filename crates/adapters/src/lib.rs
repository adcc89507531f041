//! Benchmark target adapters.
//!
//! This crate provides the BenchTarget trait, the FLANN method adapters and
//! the helpers that turn run specifications into runnable targets.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod flann;
pub mod process;

use async_trait::async_trait;
use flann::{AllKnn, AllKnnConfig, AllKnnTarget, Dataset, ExecutablePath};
use nnbench_benchmarks::BenchmarkResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Canonical benchmark target trait.
///
/// Implement this trait for any method that should be benchmarkable
/// through the canonical benchmark interface.
#[async_trait]
pub trait BenchTarget: Send + Sync {
    /// Returns the unique identifier for this benchmark target.
    fn id(&self) -> String;

    /// Run the benchmark and return results.
    async fn run(&self) -> BenchmarkResult;
}

/// One requested all-k-nearest-neighbors run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunSpec {
    /// Target id; derived from the dataset when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Reference file, optionally followed by a query file.
    pub datasets: Vec<PathBuf>,
    /// Extra options passed to the executable.
    #[serde(default)]
    pub options: String,
}

/// Settings shared by every target built from run specs.
#[derive(Debug, Clone)]
pub struct TargetDefaults {
    /// FLANN install prefix.
    pub path: ExecutablePath,
    /// Per-run timeout; `None` for no limit.
    pub timeout: Option<Duration>,
    /// Log informational messages.
    pub verbose: bool,
}

/// Build benchmark targets from run specifications.
pub fn targets_from_specs(
    specs: &[RunSpec],
    defaults: &TargetDefaults,
) -> flann::config::Result<Vec<Box<dyn BenchTarget>>> {
    specs
        .iter()
        .map(|spec| {
            let dataset = Dataset::from_paths(spec.datasets.iter().cloned())?;
            let mut config =
                AllKnnConfig::new(dataset, defaults.path.clone()).verbose(defaults.verbose);
            if let Some(timeout) = defaults.timeout {
                config = config.with_timeout(timeout);
            }
            let method = AllKnn::new(config);
            let id = spec
                .id
                .clone()
                .unwrap_or_else(|| AllKnnTarget::default_id(&method));
            Ok(Box::new(AllKnnTarget::new(id, method, spec.options.clone())) as Box<dyn BenchTarget>)
        })
        .collect()
}

/// Run targets one after another and collect their results.
pub async fn run_targets(targets: &[Box<dyn BenchTarget>]) -> Vec<BenchmarkResult> {
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        info!(target_id = %target.id(), "Running benchmark");
        let result = target.run().await;
        info!(target_id = %result.target_id, status = %result.status, "Benchmark finished");
        results.push(result);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use flann::ConfigError;

    fn defaults() -> TargetDefaults {
        TargetDefaults {
            path: ExecutablePath::new("/opt/flann/bin/"),
            timeout: Some(Duration::from_secs(10)),
            verbose: false,
        }
    }

    #[test]
    fn test_targets_from_specs() {
        let specs = vec![
            RunSpec {
                id: None,
                datasets: vec!["datasets/wine.csv".into()],
                options: "-k 3".to_string(),
            },
            RunSpec {
                id: Some("custom".to_string()),
                datasets: vec!["ref.csv".into(), "query.csv".into()],
                options: String::new(),
            },
        ];

        let targets = targets_from_specs(&specs, &defaults()).unwrap();
        let ids: Vec<_> = targets.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["flann/allknn/wine", "custom"]);
    }

    #[test]
    fn test_targets_from_specs_rejects_bad_arity() {
        let specs = vec![RunSpec {
            id: None,
            datasets: vec![],
            options: String::new(),
        }];
        let err = targets_from_specs(&specs, &defaults()).err().unwrap();
        assert_eq!(err, ConfigError::DatasetArity(0));
    }

    #[tokio::test]
    async fn test_run_targets_records_failures() {
        let specs = vec![RunSpec {
            id: Some("missing".to_string()),
            datasets: vec!["wine.csv".into()],
            options: String::new(),
        }];
        let defaults = TargetDefaults {
            path: ExecutablePath::new("/nonexistent/flann/"),
            ..defaults()
        };
        let targets = targets_from_specs(&specs, &defaults).unwrap();

        let results = run_targets(&targets).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target_id, "missing");
        assert_eq!(results[0].code, -1);
        assert!(results[0].metrics.is_empty());
    }
}
