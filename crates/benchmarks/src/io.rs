//! I/O operations for benchmark results.
//!
//! This module provides functionality to read and write benchmark
//! results to the filesystem in various formats.

use crate::markdown;
use crate::result::BenchmarkResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default output directory path.
pub const OUTPUT_DIR: &str = "benchmarks/output";

/// Raw results subdirectory name.
pub const RAW_DIR: &str = "raw";

/// Combined results file name.
pub const ALL_RESULTS_FILE: &str = "all_results.json";

/// Summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// Detailed report file name.
pub const DETAILED_FILE: &str = "detailed.md";

/// Which report files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw and combined JSON only.
    Json,
    /// Markdown summary only.
    Markdown,
    /// Everything.
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }
}

/// Ensure output directories exist.
pub fn ensure_output_dirs(dir: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(dir.as_ref().join(RAW_DIR))
}

/// Path of the raw JSON file for a result.
pub fn raw_result_path(dir: impl AsRef<Path>, result: &BenchmarkResult) -> PathBuf {
    dir.as_ref()
        .join(RAW_DIR)
        .join(format!("{}.json", result.target_id.replace('/', "_")))
}

/// Write benchmark results to JSON file.
pub fn write_results_json(results: &[BenchmarkResult], path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Write individual result to raw directory.
pub fn write_raw_result(dir: impl AsRef<Path>, result: &BenchmarkResult) -> io::Result<()> {
    ensure_output_dirs(&dir)?;
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(raw_result_path(&dir, result), json)
}

/// Write summary markdown file.
pub fn write_summary(dir: impl AsRef<Path>, results: &[BenchmarkResult]) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let summary = markdown::generate_summary(results);
    fs::write(dir.as_ref().join(SUMMARY_FILE), summary)
}

/// Write detailed markdown report.
pub fn write_detailed_report(dir: impl AsRef<Path>, results: &[BenchmarkResult]) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let report = markdown::generate_detailed_report(results);
    fs::write(dir.as_ref().join(DETAILED_FILE), report)
}

/// Write benchmark outputs in the requested format.
pub fn write_outputs(
    dir: impl AsRef<Path>,
    results: &[BenchmarkResult],
    format: OutputFormat,
) -> io::Result<()> {
    let dir = dir.as_ref();
    ensure_output_dirs(dir)?;

    if format.json() {
        for result in results {
            write_raw_result(dir, result)?;
        }
        write_results_json(results, dir.join(ALL_RESULTS_FILE))?;
    }

    if format.markdown() {
        write_summary(dir, results)?;
        write_detailed_report(dir, results)?;
    }

    Ok(())
}

/// Read results from JSON file.
pub fn read_results_json(path: impl AsRef<Path>) -> io::Result<Vec<BenchmarkResult>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Metrics, TimingResult};
    use crate::outcome::MethodError;

    fn sample_results() -> Vec<BenchmarkResult> {
        vec![
            BenchmarkResult::new("flann/allknn/wine", Metrics::from(TimingResult::new(0.5, 1.0))),
            BenchmarkResult::failed(
                "flann/allknn/iris",
                &MethodError::ParseFailure {
                    reason: "wrong format".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_write_both_formats_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let results = sample_results();

        write_outputs(dir.path(), &results, OutputFormat::Both).unwrap();

        let read = read_results_json(dir.path().join(ALL_RESULTS_FILE)).unwrap();
        let ids: Vec<_> = read.iter().map(|r| r.target_id.as_str()).collect();
        assert_eq!(ids, vec!["flann/allknn/wine", "flann/allknn/iris"]);
        assert_eq!(read[0].metrics.runtime(), Some(1.5));
        assert_eq!(read[1].code, -1);

        assert!(dir.path().join("raw/flann_allknn_wine.json").exists());
        assert!(dir.path().join(SUMMARY_FILE).exists());

        let detailed = std::fs::read_to_string(dir.path().join(DETAILED_FILE)).unwrap();
        assert!(detailed.contains("## flann/allknn/iris"));
        assert!(detailed.contains("**Status:** failed (code -1)"));
    }

    #[test]
    fn test_markdown_only_skips_json() {
        let dir = tempfile::tempdir().unwrap();
        write_outputs(dir.path(), &sample_results(), OutputFormat::Markdown).unwrap();

        assert!(dir.path().join(SUMMARY_FILE).exists());
        assert!(!dir.path().join(ALL_RESULTS_FILE).exists());
    }
}
