//! Configuration loading from nnbench.toml
//!
//! A settings file lists the benchmark runs and the FLANN defaults shared by
//! them. When no file is passed on the command line, `nnbench.toml` is
//! discovered by walking up from the current directory.
//!
//! ```toml
//! [flann]
//! path = "/opt/flann/bin/"
//! timeout = 600
//!
//! [[run]]
//! datasets = ["datasets/wine.csv"]
//! options = "-k 3"
//!
//! [[run]]
//! id = "flann/allknn/corel-split"
//! datasets = ["datasets/corel_ref.csv", "datasets/corel_query.csv"]
//! options = "-k 5"
//! ```

use nnbench_adapters::RunSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`Settings::discover`].
pub const SETTINGS_FILE: &str = "nnbench.toml";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid settings TOML.
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// nnbench configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// FLANN defaults
    #[serde(default)]
    pub flann: FlannSettings,
    /// Output configuration
    #[serde(default)]
    pub output: OutputSettings,
    /// Benchmark runs
    #[serde(default)]
    pub run: Vec<RunSpec>,
}

/// Defaults applied to every FLANN run
#[derive(Debug, Clone, Deserialize)]
pub struct FlannSettings {
    /// Install prefix of the FLANN executables
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Timeout in seconds, 0 for none
    #[serde(default)]
    pub timeout: f64,
    /// Log informational adapter messages
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FlannSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout: 0.0,
            verbose: default_verbose(),
        }
    }
}

fn default_verbose() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputSettings {
    /// Output directory for reports
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find `nnbench.toml` in `start` or one of its ancestors
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(SETTINGS_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Discover and load `nnbench.toml` starting from the current directory
    pub fn discover() -> Result<Option<(PathBuf, Self)>> {
        let Ok(cwd) = std::env::current_dir() else {
            return Ok(None);
        };
        match Self::find_from(&cwd) {
            Some(path) => {
                let settings = Self::load(&path)?;
                Ok(Some((path, settings)))
            }
            None => Ok(None),
        }
    }
}
