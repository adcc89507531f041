//! Metric types shared by all benchmark adapters.
//!
//! Adapters report a flat mapping of metric name to seconds. The FLANN
//! family reports the two phases measured by the external executable plus
//! their sum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Total runtime metric name.
pub const RUNTIME: &str = "Runtime";

/// Tree construction metric name.
pub const TREE_BUILDING: &str = "TreeBuilding";

/// Neighbor computation metric name.
pub const COMPUTING_NEIGHBORS: &str = "ComputingNeighbors";

/// Timer data reported by a tree-based nearest-neighbor executable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    /// Seconds spent building the search tree.
    pub tree_building: f64,
    /// Seconds spent computing the neighbors.
    pub computing_neighbors: f64,
}

impl TimingResult {
    /// Create a new timing record.
    pub fn new(tree_building: f64, computing_neighbors: f64) -> Self {
        Self {
            tree_building,
            computing_neighbors,
        }
    }

    /// Sum of both phases.
    pub fn total(&self) -> f64 {
        self.tree_building + self.computing_neighbors
    }
}

/// Mapping of metric name to value in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, f64>);

impl Metrics {
    /// Create an empty metrics mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Look up a metric by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Total runtime, if reported.
    pub fn runtime(&self) -> Option<f64> {
        self.get(RUNTIME)
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no metric was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<TimingResult> for Metrics {
    fn from(timer: TimingResult) -> Self {
        let mut metrics = Metrics::new();
        metrics.insert(RUNTIME, timer.total());
        metrics.insert(TREE_BUILDING, timer.tree_building);
        metrics.insert(COMPUTING_NEIGHBORS, timer.computing_neighbors);
        metrics
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.6}s", name, value)?;
            first = false;
        }
        Ok(())
    }
}
