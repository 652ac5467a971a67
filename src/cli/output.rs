//! Output formatting - styled messages, tables, and JSON

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::core::pipe::Pipe;
use crate::core::station::CompressorStation;
use crate::core::store::Selection;

#[derive(Tabled)]
struct PipeRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Length (km)")]
    length: String,
    #[tabled(rename = "Diameter (mm)")]
    diameter: u32,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Workshops")]
    workshops: String,
    #[tabled(rename = "Idle %")]
    idle: String,
    #[tabled(rename = "Class")]
    class: u32,
}

/// Print a pipe table, or a placeholder when there is nothing to show
pub fn print_pipes(pipes: &[&Pipe]) {
    if pipes.is_empty() {
        println!("{}", style("No pipes to display").dim());
        return;
    }
    println!("\n{} ({})", style("Pipes").bold(), pipes.len());
    let rows: Vec<PipeRow> = pipes
        .iter()
        .map(|pipe| PipeRow {
            id: pipe.id,
            name: pipe.name.clone(),
            length: format!("{}", pipe.length_km),
            diameter: pipe.diameter_mm,
            status: pipe.status_label(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

/// Print a station table, or a placeholder when there is nothing to show
pub fn print_stations(stations: &[&CompressorStation]) {
    if stations.is_empty() {
        println!("{}", style("No stations to display").dim());
        return;
    }
    println!("\n{} ({})", style("Compressor stations").bold(), stations.len());
    let rows: Vec<StationRow> = stations
        .iter()
        .map(|station| StationRow {
            id: station.id,
            name: station.name.clone(),
            workshops: format!(
                "{}/{} running",
                station.active_workshops, station.total_workshops
            ),
            idle: format!("{:.1}", station.inactive_percent()),
            class: station.station_class,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

/// Print records as a pretty JSON array
pub fn print_json<T: Serialize>(records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Print the warnings a selection gathered while parsing
pub fn print_selection_warnings(selection: &Selection) {
    for warning in &selection.warnings {
        println!("{} {}", style("warning:").yellow().bold(), warning);
    }
}

/// Standard success line
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Standard informational line for reported no-ops
pub fn info(message: &str) {
    println!("{} {}", style("·").cyan(), message);
}
