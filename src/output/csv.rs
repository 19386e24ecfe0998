//! CSV output formatting.

use super::Report;

/// Quote a field when it holds a comma, quote or newline; inner quotes
/// are doubled. No spaces are added after commas, spreadsheets dislike them.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') || input.contains('\n') {
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

fn csv_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| escape_csv_field(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line and one line per row. Notes become `#` comment lines.
pub fn render_csv<R: Report + ?Sized>(report: &R) -> String {
    let mut out = vec![csv_row(&report.header())];
    out.extend(report.rows().iter().map(|row| csv_row(row)));
    out.extend(report.notes().iter().map(|note| format!("# {note}")));
    out.join("\n")
}
