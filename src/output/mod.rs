//! Output formatting for engine results.
//!
//! This module handles rendering results for the command line:
//! - [`terminal`] - Aligned text tables with colors
//! - [`csv`] - CSV rows
//! - [`json`] - Pretty printed JSON
//! - [`reports`] - Tabular views of every result type

mod csv;
mod json;
mod reports;
mod terminal;

use serde::Serialize;
use std::str::FromStr;

pub use csv::{escape_csv_field, render_csv};
pub use json::render_json;
pub use reports::{ConflictReport, ContainmentReport, DistanceReport, GapReport, HostList};
pub use terminal::{format_field, render_table};

/// Output format selected on the command line or via the environment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (text, csv, json)")),
        }
    }
}

/// A result that can be shown as one table.
pub trait Report: Serialize {
    fn title(&self) -> String;
    fn header(&self) -> Vec<&'static str>;
    fn rows(&self) -> Vec<Vec<String>>;

    /// Lines shown after the table, such as per-line failures.
    fn notes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Render `report` in `format`.
pub fn render<R: Report>(report: &R, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_table(report)),
        OutputFormat::Csv => Ok(render_csv(report)),
        OutputFormat::Json => render_json(report),
    }
}
