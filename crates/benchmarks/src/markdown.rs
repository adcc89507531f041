//! Markdown output generation for benchmark results.

use crate::metrics::{COMPUTING_NEIGHBORS, RUNTIME, TREE_BUILDING};
use crate::result::BenchmarkResult;
use std::fmt::Write;

fn seconds(result: &BenchmarkResult, name: &str) -> String {
    result
        .metrics
        .get(name)
        .map(|v| format!("{:.6}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Generate a markdown summary from benchmark results.
pub fn generate_summary(results: &[BenchmarkResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark Summary").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Results").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Target ID | Status | {} (s) | {} (s) | {} (s) | Timestamp |",
        RUNTIME, TREE_BUILDING, COMPUTING_NEIGHBORS
    )
    .unwrap();
    writeln!(output, "|-----------|--------|---------|---------|---------|-----------|").unwrap();

    for result in results {
        writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} |",
            result.target_id,
            result.status,
            seconds(result, RUNTIME),
            seconds(result, TREE_BUILDING),
            seconds(result, COMPUTING_NEIGHBORS),
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        )
        .unwrap();
    }

    let failed = crate::failure_count(results);

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(output, "Total benchmarks: {} ({} failed)", results.len(), failed).unwrap();

    output
}

/// Generate detailed markdown report.
pub fn generate_detailed_report(results: &[BenchmarkResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Detailed Benchmark Report").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();

    for result in results {
        writeln!(output, "## {}", result.target_id).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Timestamp:** {}", result.timestamp.to_rfc3339()).unwrap();
        writeln!(output, "**Status:** {} (code {})", result.status, result.code).unwrap();
        if let Some(error) = &result.error {
            writeln!(output, "**Error:** {}", error).unwrap();
        }
        writeln!(output).unwrap();
        writeln!(output, "**Metrics:**").unwrap();
        writeln!(output, "```json").unwrap();
        writeln!(output, "{}", serde_json::to_string_pretty(&result.metrics).unwrap_or_default()).unwrap();
        writeln!(output, "```").unwrap();
        writeln!(output).unwrap();
    }

    output
}
