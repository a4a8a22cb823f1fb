use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use bird_summary::app::{run_summary, RunReport};
use bird_summary::config::Config;
use bird_summary::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "bird_summary")]
#[command(about = "Generate summary for Chicago Bird Collision data")]
#[command(version)]
struct Cli {
    /// Directory holding chicago_collision_data.json, flight_call.json and light_levels.json
    #[arg(long = "input_path", visible_alias = "input-path")]
    input_path: PathBuf,

    /// Path of the summary file to write (parent directories are created)
    #[arg(long = "output_file_path", visible_alias = "output-file-path")]
    output_file_path: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file, so a bad config can only go to stderr
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _guard = init_logging(&config.logging);

    match run(&cli, &config) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<RunReport> {
    let metrics_handle = match config.metrics.textfile {
        Some(_) => Some(metrics::init_textfile_exporter()?),
        None => None,
    };

    info!(
        input = %cli.input_path.display(),
        output = %cli.output_file_path.display(),
        "Generating collision summary"
    );
    let result = run_summary(&cli.input_path, &cli.output_file_path, config);

    // Metrics are written for failed runs too, and never replace the run's outcome
    if let (Some(handle), Some(path)) = (&metrics_handle, &config.metrics.textfile) {
        if let Err(e) = metrics::write_textfile(handle, path) {
            warn!("Failed to write metrics to {}: {}", path.display(), e);
        }
    }

    Ok(result?)
}

fn print_report(report: &RunReport) {
    println!("📊 Summary run {}:", report.run_id);
    println!(
        "   Collisions kept: {} of {}",
        report.collisions.rows_out, report.collisions.rows_in
    );
    println!(
        "   Flight calls kept: {} of {}",
        report.flight_calls.rows_out, report.flight_calls.rows_in
    );
    println!(
        "   Light levels kept: {} of {}",
        report.light_levels.rows_out, report.light_levels.rows_in
    );
    println!(
        "   Dropped by joins: {} (no light score), {} (no flight-call data)",
        report.joins.by_date.unmatched_left_rows, report.joins.by_taxon.unmatched_left_rows
    );
    println!("   Summary rows: {}", report.summary_rows);
    println!("   Output file: {}", report.output);
}
