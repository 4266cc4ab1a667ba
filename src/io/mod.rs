//! I/O module
//!
//! Handles event log parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record validation, duration output)
//! - `json_format` - Columnar JSON logs from the log-fetch collaborator
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `report_writer` - JSON report files and directory layout
//! - `console` - Tabular console rendering

pub mod async_reader;
pub mod console;
pub mod csv_format;
pub mod json_format;
pub mod report_writer;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_durations_csv, CsvEventRecord};
pub use json_format::{parse_json_log, read_json_log};
pub use report_writer::{ReportConfig, ReportWriter, WrittenReport};
pub use sync_reader::SyncReader;

use clap::ValueEnum;
use std::path::Path;

/// Event log file format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guess the format from the file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}
