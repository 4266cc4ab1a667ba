//! Error types for the transfer reconciler
//!
//! This module defines all error types that can occur while loading an event
//! log, reconciling it, and writing the resulting report.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Parsing Errors**: Malformed CSV/JSON, mismatched column lengths
//! - **Validation Errors**: Missing transfer id, unknown event type, bad timestamp
//! - **Report Errors**: Failure to serialize or persist the report
//!
//! Validation errors are fatal to the whole run: a batch containing a single
//! invalid event is rejected rather than partially reconciled. Missing stages
//! and empty cohorts are not errors and never surface here.

use crate::types::event::Stage;
use thiserror::Error;

/// Main error type for the reconciler
///
/// Each variant includes the context needed to locate the offending input.
/// `row` is the 1-based line number for CSV input (header included) and the
/// 0-based record index for JSON input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The input could not be parsed as CSV or JSON
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// An event has an empty transfer id
    #[error("Event at row {row} has no transfer id")]
    MissingTransferId {
        /// Row of the offending event
        row: u64,
    },

    /// Event type outside the fixed lifecycle stage set
    #[error("Invalid event type '{event_type}' at row {row}")]
    InvalidEventType {
        /// The invalid event type string
        event_type: String,
        /// Row of the offending event
        row: u64,
    },

    /// Event timestamp is not ISO-parseable
    #[error("Invalid timestamp '{value}' at row {row}")]
    InvalidTimestamp {
        /// The unparseable timestamp string
        value: String,
        /// Row of the offending event
        row: u64,
    },

    /// Columnar input whose columns disagree on length
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        /// Column with the wrong length
        column: String,
        /// Length of the reference column
        expected: usize,
        /// Length of this column
        actual: usize,
    },

    /// A transfer entered the same stage more than once
    ///
    /// Only raised under the `Reject` duplicate policy.
    #[error("Transfer {transfer_id} has more than one '{stage}' event")]
    DuplicateStage {
        /// Transfer with the duplicate events
        transfer_id: String,
        /// Stage that was repeated
        stage: Stage,
    },

    /// The report could not be serialized or written
    #[error("Report error: {message}")]
    ReportError {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for ReconcileError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(error: serde_json::Error) -> Self {
        let line = match error.line() {
            0 => None,
            line => Some(line as u64),
        };

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReconcileError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        ReconcileError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a MissingTransferId error
    pub fn missing_transfer_id(row: u64) -> Self {
        ReconcileError::MissingTransferId { row }
    }

    /// Create an InvalidEventType error
    pub fn invalid_event_type(event_type: &str, row: u64) -> Self {
        ReconcileError::InvalidEventType {
            event_type: event_type.to_string(),
            row,
        }
    }

    /// Create an InvalidTimestamp error
    pub fn invalid_timestamp(value: &str, row: u64) -> Self {
        ReconcileError::InvalidTimestamp {
            value: value.to_string(),
            row,
        }
    }

    /// Create a ColumnLengthMismatch error
    pub fn column_length_mismatch(column: &str, expected: usize, actual: usize) -> Self {
        ReconcileError::ColumnLengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        }
    }

    /// Create a DuplicateStage error
    pub fn duplicate_stage(transfer_id: &str, stage: Stage) -> Self {
        ReconcileError::DuplicateStage {
            transfer_id: transfer_id.to_string(),
            stage,
        }
    }

    /// Create a ReportError
    pub fn report(message: impl Into<String>) -> Self {
        ReconcileError::ReportError {
            message: message.into(),
        }
    }
}
