// Copyright 2025 nnbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Construction-time configuration for the FLANN adapters.
//!
//! Configuration is resolved once and is read-only afterwards. The install
//! prefix of the FLANN executables comes from an explicit path, falling back
//! to the `FLANN_PATH` environment variable. Dataset paths are accepted as
//! given; a missing file only surfaces when the executable runs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the default FLANN install prefix.
pub const FLANN_PATH_ENV: &str = "FLANN_PATH";

/// Errors that can occur while building an adapter configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No explicit path was given and `FLANN_PATH` is unset.
    #[error("No FLANN executable path given and FLANN_PATH is not set")]
    MissingExecutablePath,

    /// A dataset must be one reference file or a reference/query pair.
    #[error("Expected 1 or 2 dataset files, got {0}")]
    DatasetArity(usize),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Input files for an all-k-nearest-neighbors run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// Neighbors of the reference set within itself.
    Reference(PathBuf),
    /// Neighbors of each query point within the reference set.
    ReferenceQuery {
        /// The indexed set.
        reference: PathBuf,
        /// The points whose neighbors are searched.
        query: PathBuf,
    },
}

impl Dataset {
    /// Build a dataset from one or two paths; the second is the query set.
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        match paths.len() {
            1 => Ok(Self::Reference(paths.remove(0))),
            2 => {
                let query = paths.remove(1);
                let reference = paths.remove(0);
                Ok(Self::ReferenceQuery { reference, query })
            }
            n => Err(ConfigError::DatasetArity(n)),
        }
    }

    /// The reference set.
    pub fn reference(&self) -> &Path {
        match self {
            Self::Reference(reference) | Self::ReferenceQuery { reference, .. } => reference,
        }
    }

    /// The query set, if separate from the reference set.
    pub fn query(&self) -> Option<&Path> {
        match self {
            Self::Reference(_) => None,
            Self::ReferenceQuery { query, .. } => Some(query),
        }
    }

    /// Short name for the dataset, taken from the reference file stem.
    pub fn name(&self) -> String {
        self.reference()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    }
}

/// Install prefix of the FLANN executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutablePath(PathBuf);

impl ExecutablePath {
    /// Use an explicit install prefix.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self(prefix.into())
    }

    /// Read the prefix from `FLANN_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None)
    }

    /// Prefer `explicit`, falling back to `FLANN_PATH`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        Self::resolve_from(explicit, std::env::var_os(FLANN_PATH_ENV))
    }

    fn resolve_from(explicit: Option<PathBuf>, env: Option<OsString>) -> Result<Self> {
        explicit
            .or_else(|| env.map(PathBuf::from))
            .map(Self)
            .ok_or(ConfigError::MissingExecutablePath)
    }

    /// The install prefix.
    pub fn prefix(&self) -> &Path {
        &self.0
    }

    /// Full path of the named executable: the prefix with `name` appended.
    ///
    /// The prefix is concatenated, not joined, so a directory prefix needs
    /// its trailing separator (`/opt/flann/bin/`). An empty prefix leaves the
    /// name bare so it is looked up on `PATH`.
    pub fn executable(&self, name: &str) -> PathBuf {
        let mut program = self.0.clone().into_os_string();
        program.push(name);
        PathBuf::from(program)
    }
}

/// Configuration of one all-k-nearest-neighbors benchmark.
#[derive(Debug, Clone)]
pub struct AllKnnConfig {
    dataset: Dataset,
    path: ExecutablePath,
    timeout: Option<Duration>,
    verbose: bool,
}

impl AllKnnConfig {
    /// Create a configuration with no timeout and verbose logging.
    pub fn new(dataset: Dataset, path: ExecutablePath) -> Self {
        Self {
            dataset,
            path,
            timeout: None,
            verbose: true,
        }
    }

    /// Create a configuration whose executable prefix comes from `FLANN_PATH`.
    pub fn from_env(dataset: Dataset) -> Result<Self> {
        Ok(Self::new(dataset, ExecutablePath::from_env()?))
    }

    /// Set the timeout; zero means no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Enable or disable informational messages.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Input files.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Executable install prefix.
    pub fn path(&self) -> &ExecutablePath {
        &self.path
    }

    /// Timeout, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether informational messages are logged.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
