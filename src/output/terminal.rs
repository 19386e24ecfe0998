//! Terminal output utilities.
//!
//! Renders reports as aligned tables. Colors come from `colored`, which
//! honours `NO_COLOR` and `CLICOLOR`.

use super::Report;
use colored::Colorize;

/// Format a value as a left-aligned field of at least `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.chars().count() >= width {
        value_str
    } else {
        format!("{value_str:<width$}")
    }
}

fn column_widths(header: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

fn join_row(cells: &[String]) -> String {
    cells.join("  ").trim_end().to_string()
}

/// Title, header and rows, columns padded to the widest cell.
pub fn render_table<R: Report + ?Sized>(report: &R) -> String {
    let header = report.header();
    let rows = report.rows();
    let widths = column_widths(&header, &rows);

    let mut out = Vec::new();
    out.push(format!("# {}", report.title()).bold().to_string());
    if !header.is_empty() {
        let cells: Vec<String> = header
            .iter()
            .zip(&widths)
            .map(|(h, w)| format_field(h, *w))
            .collect();
        out.push(join_row(&cells).cyan().to_string());
    }
    if rows.is_empty() {
        out.push("(none)".dimmed().to_string());
    }
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format_field(c, *w))
            .collect();
        out.push(join_row(&cells));
    }
    for note in report.notes() {
        out.push(format!("#{}# {note}", "NOTE".on_red()));
    }
    out.join("\n")
}
