pub mod csv_out;
pub mod json;
pub mod lattice_grid;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Numbers render to four decimal places, integers as-is.
pub(crate) fn format_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        n.as_f64()
            .map(|f| format!("{f:.4}"))
            .unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}
