// Copyright 2025 nnbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! FLANN all-k-nearest-neighbors benchmark.
//!
//! Runs `<prefix>allknn -r <reference> [-q <query>] -v <options>` and reports
//! the tree building and neighbor computation timers printed by the
//! executable.
//!
//! # Example
//!
//! ```ignore
//! use nnbench_adapters::flann::{AllKnn, AllKnnConfig, Dataset};
//!
//! let dataset = Dataset::from_paths(["datasets/wine.csv"])?;
//! let method = AllKnn::new(AllKnnConfig::from_env(dataset)?);
//!
//! match method.run_metrics("-k 3").await {
//!     Ok(metrics) => println!("{metrics}"),
//!     Err(e) => eprintln!("failed with code {}: {e}", e.code()),
//! }
//! ```

use super::config::AllKnnConfig;
use super::timer::parse_timer;
use crate::process::{self, ProcessError};
use crate::BenchTarget;
use async_trait::async_trait;
use nnbench_benchmarks::{BenchmarkResult, MethodError, Metrics, RunOutcome};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Name of the executable under the FLANN install prefix.
pub const EXECUTABLE: &str = "allknn";

/// Fully tokenized command for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Program to execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, excluding the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program followed by its arguments, as lossy strings.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.argv())
    }
}

/// The all-k-nearest-neighbors benchmark.
#[derive(Debug, Clone)]
pub struct AllKnn {
    config: AllKnnConfig,
}

impl AllKnn {
    /// Create the benchmark from its configuration.
    pub fn new(config: AllKnnConfig) -> Self {
        Self { config }
    }

    /// The benchmark configuration.
    pub fn config(&self) -> &AllKnnConfig {
        &self.config
    }

    fn base_args(&self) -> Vec<OsString> {
        let dataset = self.config.dataset();
        let mut args: Vec<OsString> = vec!["-r".into(), dataset.reference().into()];
        if let Some(query) = dataset.query() {
            args.push("-q".into());
            args.push(query.into());
        }
        args.push("-v".into());
        args
    }

    /// Build the command for a run with the given extra options.
    ///
    /// Options are split with shell word rules but are never handed to a
    /// shell, so metacharacters arrive as literal arguments.
    pub fn command_line(&self, options: &str) -> Result<CommandLine, MethodError> {
        let program = self.config.path().executable(EXECUTABLE);
        let mut args = self.base_args();

        let extra = shlex::split(options).ok_or_else(|| MethodError::ExecutionFailure {
            command: format!("{} {}", program.display(), options),
            reason: "unbalanced quoting in method options".to_string(),
        })?;
        args.extend(extra.into_iter().map(OsString::from));

        Ok(CommandLine { program, args })
    }

    /// Perform all-k-nearest-neighbors and collect the timer metrics.
    ///
    /// Returns `Runtime`, `TreeBuilding` and `ComputingNeighbors` in seconds.
    pub async fn run_metrics(&self, options: &str) -> RunOutcome {
        if self.config.is_verbose() {
            info!("Perform ALLKNN.");
        }

        let command = match self.command_line(options) {
            Ok(command) => command,
            Err(e) => {
                error!(options, "Could not execute command: {}", e);
                return Err(e);
            }
        };

        let output =
            match process::run_merged(command.program(), command.args(), self.config.timeout())
                .await
            {
                Ok(output) => output,
                Err(ProcessError::Timeout(timeout)) => {
                    warn!(%command, ?timeout, "Command timed out");
                    return Err(MethodError::Timeout { timeout });
                }
                Err(e) => {
                    if let ProcessError::Exit { output, .. } = &e {
                        debug!(output = %String::from_utf8_lossy(output), "Captured output");
                    }
                    error!(error = %e, "Could not execute command: {}", command);
                    return Err(MethodError::ExecutionFailure {
                        command: command.to_string(),
                        reason: e.to_string(),
                    });
                }
            };

        let timer = parse_timer(&String::from_utf8_lossy(&output))?;
        let metrics = Metrics::from(timer);

        if self.config.is_verbose() {
            info!("total time: {:.6}s", timer.total());
        }

        Ok(metrics)
    }
}

impl fmt::Display for AllKnn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let command = CommandLine {
            program: self.config.path().executable(EXECUTABLE),
            args: self.base_args(),
        };
        write!(f, "FLANN_ALLKNN ({})", command)
    }
}

/// A registered all-k-nearest-neighbors run.
#[derive(Debug, Clone)]
pub struct AllKnnTarget {
    id: String,
    method: AllKnn,
    options: String,
}

impl AllKnnTarget {
    /// Create a target running `method` with `options`.
    pub fn new(id: impl Into<String>, method: AllKnn, options: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            options: options.into(),
        }
    }

    /// Default target id for a method: `flann/allknn/<dataset>`.
    pub fn default_id(method: &AllKnn) -> String {
        format!("flann/allknn/{}", method.config().dataset().name())
    }

    /// The wrapped method.
    pub fn method(&self) -> &AllKnn {
        &self.method
    }
}

#[async_trait]
impl BenchTarget for AllKnnTarget {
    fn id(&self) -> String {
        self.id.clone()
    }

    async fn run(&self) -> BenchmarkResult {
        let outcome = self.method.run_metrics(&self.options).await;
        BenchmarkResult::from_outcome(self.id.clone(), outcome)
    }
}
