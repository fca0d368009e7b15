mod cli;
mod output;
mod utils;

use anyhow::Result;
use clap::Parser;
use meshflux_core::{Collector, CollectorConfig, CollectorError, RunReport, WriteOutcome};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Cli;
use crate::output::{OutputFormat, print_lines, print_report};
use crate::utils::{print_error, print_info, print_success, print_warning};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set up logging
    setup_logging(&cli);

    let config = cli.collector_config();
    let report = match collect_and_upload(&config, cli.format).await {
        Ok(report) => report,
        Err(e) => {
            print_error(&e.to_string());
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    print_report(&report, cli.format)?;
    Ok(summarize(&report, config.fail_on_write_error))
}

/// Text output echoes the batch before the upload starts, so the lines are
/// visible even while a slow write is pending.
async fn collect_and_upload(
    config: &CollectorConfig,
    format: OutputFormat,
) -> Result<RunReport, CollectorError> {
    let collector = Collector::new(config)?;
    let batch = collector.collect().await?;
    if format == OutputFormat::Text {
        print_lines(&batch.lines);
    }
    Ok(collector.upload(batch).await)
}

fn summarize(report: &RunReport, fail_on_write_error: bool) -> ExitCode {
    let fieldless = report.points.len().saturating_sub(report.lines.len());
    if fieldless > 0 {
        print_warning(&format!(
            "{fieldless} recently heard node(s) reported no telemetry and were skipped"
        ));
    }

    match &report.write {
        WriteOutcome::Written { .. } => print_success("Data uploaded successfully!"),
        WriteOutcome::Empty => print_info("No recently heard nodes, nothing uploaded"),
        WriteOutcome::Skipped { points } => {
            print_info(&format!("Dry run: {points} point(s) not uploaded"))
        }
        WriteOutcome::Failed { error } => {
            print_error(&format!("Failed to write to InfluxDB: {error}"));
            if fail_on_write_error {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn setup_logging(cli: &Cli) {
    let filter_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
