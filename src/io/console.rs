//! Console rendering of the report tables

use crate::types::{ErrorRow, OutcomeSummary, ReconciliationReport};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use serde_json::Value;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table
}

fn value_cell(value: &Value) -> Cell {
    let text = match value {
        Value::Null => "-".to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format!("{float:.6}"),
            _ => number.to_string(),
        },
        other => other.to_string(),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// One-row table of a cohort summary, columns in report order
pub fn summary_table(summary: &OutcomeSummary) -> Table {
    let columns = summary.columns();
    let mut table = new_table();
    table.set_header(columns.iter().map(|(name, _)| Cell::new(name)));
    table.add_row(columns.iter().map(|(_, value)| value_cell(value)));
    table
}

/// Transfer id and joined error messages, one row per failed transfer
pub fn errors_table(errors: &[ErrorRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["transfer_id", "errors"]);
    for row in errors {
        table.add_row(vec![row.transfer_id.clone(), row.errors.join("; ")]);
    }
    table
}

/// Render every non-empty section with its title
pub fn render_report(report: &ReconciliationReport) -> String {
    let mut sections = Vec::new();

    for summary in [&report.success, &report.failed] {
        if summary.is_complete() {
            sections.push(format!(
                "Average times when {}\n{}\n",
                summary.outcome,
                summary_table(summary)
            ));
        }
    }
    if !report.errors.is_empty() {
        sections.push(format!("Failed log\n{}\n", errors_table(&report.errors)));
    }

    sections.join("\n")
}

/// Print the rendered report to stdout
pub fn print_report(report: &ReconciliationReport) {
    let rendered = render_report(report);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}
