//! Benchmark result types.
//!
//! This module provides the BenchmarkResult record written by the harness
//! for every target it runs, successful or not.

use crate::metrics::Metrics;
use crate::outcome::{MethodError, RunOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final status of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Metrics were collected.
    Success,
    /// The method exceeded its timeout.
    Timeout,
    /// The method failed to run or its output could not be parsed.
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Canonical benchmark result structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Unique identifier for the benchmark target.
    pub target_id: String,
    /// Final status of the run.
    pub status: RunStatus,
    /// 0 on success, otherwise the sentinel code of the failure.
    pub code: i32,
    /// Collected metrics; empty unless the run succeeded.
    pub metrics: Metrics,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Timestamp when the benchmark was executed.
    pub timestamp: DateTime<Utc>,
}

impl BenchmarkResult {
    /// Create a successful BenchmarkResult.
    pub fn new(target_id: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            target_id: target_id.into(),
            status: RunStatus::Success,
            code: 0,
            metrics,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a BenchmarkResult for a failed run.
    pub fn failed(target_id: impl Into<String>, error: &MethodError) -> Self {
        let status = if error.is_timeout() {
            RunStatus::Timeout
        } else {
            RunStatus::Failed
        };
        Self {
            target_id: target_id.into(),
            status,
            code: error.code(),
            metrics: Metrics::new(),
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Create a BenchmarkResult from a run outcome.
    pub fn from_outcome(target_id: impl Into<String>, outcome: RunOutcome) -> Self {
        match outcome {
            Ok(metrics) => Self::new(target_id, metrics),
            Err(e) => Self::failed(target_id, &e),
        }
    }

    /// Whether the run produced metrics.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}
