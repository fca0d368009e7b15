use crate::utils::{format_ago, format_uptime};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use meshflux_core::collect::SHORT_NAME_TAG;
use meshflux_core::line_protocol::Metric;
use meshflux_core::{Point, RunReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Line protocol, one point per line
    Text,
    Table,
    Json,
}

pub fn print_output<T: Serialize>(data: T) -> Result<()> {
    let json = serde_json::to_string_pretty(&data).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn print_lines(lines: &[String]) {
    println!("Appending Nodes for DB upload:");
    for line in lines {
        println!("{line}");
    }
}

/// Print the finished run. Text output was already echoed by [`print_lines`].
pub fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_output(report)?,
        OutputFormat::Text => {}
        OutputFormat::Table => {
            if report.points.is_empty() {
                println!(
                    "No nodes heard recently ({seen} in node table)",
                    seen = report.nodes_seen
                );
                return Ok(());
            }
            println!("{table}", table = points_table(&report.points, report.polled_at));
        }
    }
    Ok(())
}

fn points_table(points: &[Point], now: DateTime<Utc>) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Short Name"),
        Cell::new("Last Heard"),
        Cell::new("Battery (%)"),
        Cell::new("Voltage (V)"),
        Cell::new("Ch. Util (%)"),
        Cell::new("Air Util TX (%)"),
        Cell::new("Uptime"),
        Cell::new("SNR (dB)"),
    ]);

    for point in points {
        let value = |metric: Metric| {
            point
                .fields
                .iter()
                .find(|f| f.name == metric)
                .map(|f| f.value.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        };
        let uptime = point
            .fields
            .iter()
            .find(|f| f.name == Metric::Uptime)
            .and_then(|f| f.value.as_u64())
            .map(format_uptime)
            .unwrap_or_else(|| "N/A".to_string());

        table.add_row(vec![
            Cell::new(point.tag_value(SHORT_NAME_TAG).unwrap_or("")),
            Cell::new(format_ago((now - point.time()).num_seconds())),
            Cell::new(value(Metric::BatteryLevel)),
            Cell::new(value(Metric::Voltage)),
            Cell::new(value(Metric::ChannelUtilization)),
            Cell::new(value(Metric::AirUtilTx)),
            Cell::new(uptime),
            Cell::new(value(Metric::Snr)),
        ]);
    }

    table
}
