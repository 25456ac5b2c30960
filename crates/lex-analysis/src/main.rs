//! CLI entry point for the dataset analysis pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lex_analysis::{AnalysisConfig, AnalysisOutcome, Pipeline, StageOutcome};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Descriptive-statistics report generator for CSV files",
    long_about = "Reads a CSV file and writes <output-root>/<name>/ containing README.md,\n\
                  a correlation heatmap and a missing-values chart.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  AIPROXY_TOKEN    API token (read from the environment or a .env file)\n\n\
                  EXAMPLES:\n  \
                  # Report next to the current directory\n  \
                  lex-analysis media.csv\n\n  \
                  # UTF-8 input, reports under ./reports\n  \
                  lex-analysis media.csv --encoding utf-8 -o reports"
)]
struct Args {
    /// Path to the CSV file to analyze
    input: PathBuf,

    /// Directory in which the per-dataset output directory is created
    #[arg(short, long, default_value = ".")]
    output_root: PathBuf,

    /// Text encoding of the input file (any WHATWG label)
    #[arg(long, default_value = lex_analysis::config::DEFAULT_ENCODING)]
    encoding: String,

    /// Absolute Z-score above which a value counts as an outlier
    #[arg(long, default_value_t = lex_analysis::config::DEFAULT_ZSCORE_THRESHOLD)]
    zscore_threshold: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run outcome as JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let config = AnalysisConfig::builder()
        .output_root(&args.output_root)
        .encoding(&args.encoding)
        .zscore_threshold(args.zscore_threshold)
        .api_token_from_env()
        .build()
        .context("Invalid configuration")?;

    let pipeline = build_pipeline(&args, config)?;

    match pipeline.run(&args.input) {
        Ok(outcome) => handle_outcome(&outcome, &args),
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(anyhow!("Analysis failed: {}", e))
        }
    }
}

fn build_pipeline(args: &Args, config: AnalysisConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Print the outcome as JSON with `--json`, otherwise as a short summary.
fn handle_outcome(outcome: &AnalysisOutcome, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    print_human_readable_summary(outcome);
    Ok(())
}

fn print_human_readable_summary(outcome: &AnalysisOutcome) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        outcome.input_file.display(),
        outcome.rows,
        outcome.columns
    );
    println!("Report: {}", outcome.report_path.display());
    println!();

    println!("Artifacts:");
    println!("  Correlation heatmap: {}", describe_stage(&outcome.heatmap));
    println!(
        "  Missing values plot: {}",
        describe_stage(&outcome.missing_values_plot)
    );
    println!();

    println!("Missing values: {} total", outcome.missing_values.total());
    let flagged: Vec<_> = outcome
        .outliers
        .entries
        .iter()
        .filter(|(_, count)| *count > 0)
        .collect();
    if flagged.is_empty() {
        println!("Outliers: none detected");
    } else {
        println!("Outliers:");
        for (column, count) in flagged {
            println!("  - {}: {}", column, count);
        }
    }
    println!();

    println!("Duration: {}ms", outcome.duration_ms);
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

fn describe_stage(stage: &StageOutcome) -> String {
    match stage {
        StageOutcome::Written { path } => path.display().to_string(),
        StageOutcome::Skipped { reason } => format!("skipped ({})", reason),
    }
}
