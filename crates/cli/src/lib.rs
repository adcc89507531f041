//! CLI for nnbench.
//!
//! This crate provides the command-line interface that runs the FLANN
//! all-k-nearest-neighbors adapter and writes the canonical result files.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod settings;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use nnbench_adapters::flann::{ExecutablePath, FLANN_PATH_ENV};
use nnbench_adapters::{run_targets, targets_from_specs, RunSpec, TargetDefaults};
use nnbench_benchmarks::io::{self, OutputFormat};
use nnbench_benchmarks::markdown;
use settings::Settings;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// nnbench CLI.
#[derive(Parser, Debug)]
#[command(name = "nnbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Report formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Raw and combined JSON.
    Json,
    /// Markdown summary.
    Markdown,
    /// JSON and Markdown.
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Both => OutputFormat::Both,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run FLANN all-k-nearest-neighbors benchmarks and write the results.
    ///
    /// Runs come from the `[[run]]` entries of the settings file plus one
    /// run for the datasets given on the command line. Results are written
    /// to:
    /// - <output>/raw/ - Individual JSON files per benchmark
    /// - <output>/all_results.json - Combined JSON file
    /// - <output>/summary.md - Markdown summary
    /// - <output>/detailed.md - Per-target Markdown report
    Run {
        /// Reference dataset, optionally followed by a query dataset.
        #[arg(num_args = 0..=2)]
        datasets: Vec<PathBuf>,

        /// Install prefix of the FLANN executables.
        #[arg(long, env = "FLANN_PATH")]
        flann_path: Option<PathBuf>,

        /// Timeout per run in seconds, fractions allowed (0 for none).
        #[arg(short, long)]
        timeout: Option<f64>,

        /// Extra options passed to allknn, e.g. "-k 3".
        #[arg(long, default_value = "", allow_hyphen_values = true, requires = "datasets")]
        options: String,

        /// Target id for the command-line run.
        #[arg(long, requires = "datasets")]
        id: Option<String>,

        /// Settings file (default: discover nnbench.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory override (optional).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "both")]
        format: FormatArg,

        /// Suppress informational adapter messages.
        #[arg(short, long)]
        quiet: bool,

        /// Verbose output.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a Markdown report of previously written results.
    Report {
        /// Combined results file (default: <output>/all_results.json).
        input: Option<PathBuf>,

        /// Print the per-target report instead of the summary table.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show benchmark status and configuration.
    Status {
        /// Show detailed status information.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the default.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nnbench_cli={level},nnbench_adapters={level},nnbench_benchmarks={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Convert a timeout in seconds; zero means no timeout.
fn timeout_from_secs(secs: f64) -> anyhow::Result<Option<Duration>> {
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| anyhow!("Invalid timeout: {secs} seconds"))
}

fn load_settings(explicit: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match explicit {
        Some(path) => Ok(Settings::load(path)?),
        None => match Settings::discover()? {
            Some((path, settings)) => {
                debug!(path = %path.display(), "Loaded settings");
                Ok(settings)
            }
            None => Ok(Settings::default()),
        },
    }
}

/// Run the CLI with the given arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            datasets,
            flann_path,
            timeout,
            options,
            id,
            config,
            output,
            format,
            quiet,
            verbose,
        } => {
            init_tracing(verbose);

            let settings = load_settings(config.as_ref())?;

            let path = ExecutablePath::resolve(flann_path.or(settings.flann.path.clone()))?;
            let timeout = timeout_from_secs(timeout.unwrap_or(settings.flann.timeout))?;
            let defaults = TargetDefaults {
                path,
                timeout,
                verbose: !quiet && settings.flann.verbose,
            };

            let mut specs = settings.run.clone();
            if !datasets.is_empty() {
                specs.push(RunSpec {
                    id,
                    datasets,
                    options,
                });
            }
            if specs.is_empty() {
                bail!("No benchmark runs configured: pass dataset paths or add [[run]] entries to nnbench.toml");
            }

            let targets = targets_from_specs(&specs, &defaults)?;
            info!(count = targets.len(), "Running benchmarks");

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let results = runtime.block_on(run_targets(&targets));

            let output_dir = output
                .or(settings.output.directory)
                .unwrap_or_else(|| PathBuf::from(io::OUTPUT_DIR));
            io::write_outputs(&output_dir, &results, format.into())
                .with_context(|| format!("Failed to write results to {}", output_dir.display()))?;

            println!(
                "Completed {} benchmarks ({} failed)",
                results.len(),
                nnbench_benchmarks::failure_count(&results)
            );
            println!("Results written to {}/", output_dir.display());

            if verbose {
                for result in &results {
                    println!(
                        "  - {}: {} {}",
                        result.target_id, result.status, result.metrics
                    );
                }
            }

            Ok(())
        }
        Commands::Report { input, detailed } => {
            let input = input.unwrap_or_else(|| {
                PathBuf::from(io::OUTPUT_DIR).join(io::ALL_RESULTS_FILE)
            });
            let results = io::read_results_json(&input)
                .with_context(|| format!("Failed to read results from {}", input.display()))?;

            if detailed {
                print!("{}", markdown::generate_detailed_report(&results));
            } else {
                print!("{}", markdown::generate_summary(&results));
            }

            Ok(())
        }
        Commands::Status { detailed } => {
            println!("nnbench Benchmark System");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));

            match ExecutablePath::from_env() {
                Ok(path) => println!("FLANN path: {}", path.prefix().display()),
                Err(_) => println!("FLANN path: <unset, export {}>", FLANN_PATH_ENV),
            }

            if detailed {
                let settings_file = std::env::current_dir()
                    .ok()
                    .and_then(|cwd| Settings::find_from(&cwd));
                match settings_file {
                    Some(path) => println!("\nSettings file: {}", path.display()),
                    None => println!("\nSettings file: <none>"),
                }
                println!("\nOutput directories:");
                println!("  - {}/", io::OUTPUT_DIR);
                println!("  - {}/{}/", io::OUTPUT_DIR, io::RAW_DIR);
                println!("\nOutput files:");
                println!("  - {}/{}", io::OUTPUT_DIR, io::SUMMARY_FILE);
                println!("  - {}/{}", io::OUTPUT_DIR, io::DETAILED_FILE);
                println!("  - {}/{}", io::OUTPUT_DIR, io::ALL_RESULTS_FILE);
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_query_set() {
        let cli = Cli::try_parse_from([
            "nnbench",
            "run",
            "ref.csv",
            "query.csv",
            "--flann-path",
            "/opt/flann/bin/",
            "--timeout",
            "30",
            "--options",
            "-k 3",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                datasets,
                flann_path,
                timeout,
                options,
                format,
                ..
            } => {
                assert_eq!(datasets, vec![PathBuf::from("ref.csv"), PathBuf::from("query.csv")]);
                assert_eq!(flann_path, Some(PathBuf::from("/opt/flann/bin/")));
                assert_eq!(timeout, Some(30.0));
                assert_eq!(options, "-k 3");
                assert_eq!(format, FormatArg::Both);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_three_datasets() {
        let result = Cli::try_parse_from(["nnbench", "run", "a.csv", "b.csv", "c.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_format() {
        let cli = Cli::try_parse_from(["nnbench", "run", "a.csv", "--format", "markdown"]).unwrap();
        match cli.command {
            Commands::Run { format, .. } => {
                assert_eq!(OutputFormat::from(format), OutputFormat::Markdown)
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_fractional_timeout() {
        let cli = Cli::try_parse_from(["nnbench", "run", "a.csv", "--timeout", "0.5"]).unwrap();
        match cli.command {
            Commands::Run { timeout, .. } => assert_eq!(timeout, Some(0.5)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs(0.0).unwrap(), None);
        assert_eq!(
            timeout_from_secs(0.25).unwrap(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(timeout_from_secs(600.0).unwrap(), Some(Duration::from_secs(600)));
        assert!(timeout_from_secs(-1.0).is_err());
        assert!(timeout_from_secs(f64::NAN).is_err());
    }

    #[test]
    fn test_options_and_id_require_datasets() {
        assert!(Cli::try_parse_from(["nnbench", "run", "--options", "-k 3"]).is_err());
        assert!(Cli::try_parse_from(["nnbench", "run", "--id", "wine"]).is_err());
        assert!(Cli::try_parse_from(["nnbench", "run", "wine.csv", "--id", "wine"]).is_ok());
        assert!(Cli::try_parse_from(["nnbench", "run"]).is_ok());
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from(["nnbench", "report", "--detailed"]).unwrap();
        match cli.command {
            Commands::Report { input, detailed } => {
                assert!(input.is_none());
                assert!(detailed);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_report_reads_written_results() {
        use nnbench_benchmarks::{BenchmarkResult, Metrics, TimingResult};
        use std::ffi::OsStr;

        let dir = tempfile::tempdir().unwrap();
        let results = vec![BenchmarkResult::new(
            "flann/allknn/wine",
            Metrics::from(TimingResult::new(0.5, 1.0)),
        )];
        io::write_outputs(dir.path(), &results, OutputFormat::Json).unwrap();

        let input = dir.path().join(io::ALL_RESULTS_FILE);
        let cli = Cli::try_parse_from([
            OsStr::new("nnbench"),
            OsStr::new("report"),
            input.as_os_str(),
        ])
        .unwrap();
        run_with_cli(cli).unwrap();

        let missing = Cli::try_parse_from([
            OsStr::new("nnbench"),
            OsStr::new("report"),
            dir.path().join("missing.json").as_os_str(),
        ])
        .unwrap();
        assert!(run_with_cli(missing).is_err());
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["nnbench", "status", "--detailed"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { detailed: true }));
    }

    #[test]
    fn test_load_explicit_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "[[run]]\ndatasets = [\"wine.csv\"]\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.run.len(), 1);
    }
}
