//! Error extractor
//!
//! Hands the `{transfer_id, errors}` capture taken while merging the
//! `failed` stage to the report, unmodified. Used for failure diagnostics
//! only, never for statistics.

use crate::types::ErrorRow;

/// Error table for every transfer that reached `failed`
pub fn extract_errors(failed_log: Vec<ErrorRow>) -> Vec<ErrorRow> {
    failed_log
}

/// Number of distinct error messages across the table
pub fn distinct_messages(errors: &[ErrorRow]) -> usize {
    let mut messages: Vec<&str> = errors
        .iter()
        .flat_map(|row| row.errors.iter().map(String::as_str))
        .collect();
    messages.sort_unstable();
    messages.dedup();
    messages.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, errors: &[&str]) -> ErrorRow {
        ErrorRow {
            transfer_id: id.to_string(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_extract_errors_is_pass_through() {
        let captured = vec![
            row("4710795078270976", &["Specified amount is zero"]),
            row("5766326240935936", &[]),
        ];

        assert_eq!(extract_errors(captured.clone()), captured);
    }

    #[test]
    fn test_distinct_messages() {
        let errors = vec![
            row("a", &["Target account is closed"]),
            row("b", &["Target account is closed", "Specified amount is zero"]),
            row("c", &[]),
        ];

        assert_eq!(distinct_messages(&errors), 2);
    }
}
