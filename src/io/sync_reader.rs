//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over event records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<EventRecord, ReconcileError>` for each CSV row:
//!
//! ```no_run
//! use rust_transfer_reconciler::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("events.csv")).unwrap();
//! let events: Result<Vec<_>, _> = reader.collect();
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants carrying the file
//!   line the row starts on (header is line 1); callers decide whether to stop

use crate::io::csv_format::{convert_csv_record, CsvEventRecord};
use crate::types::{EventRecord, ReconcileError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader<R: Read = File> {
    reader: csv::Reader<R>,
    headers: Option<StringRecord>,
}

impl SyncReader<File> {
    /// Open a CSV event log
    ///
    /// The CSV reader is configured to trim whitespace from all fields and
    /// to allow a missing trailing `errors` column.
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if the path does not exist
    /// * `IoError` for any other open failure
    pub fn new(path: &Path) -> Result<Self, ReconcileError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReconcileError::file_not_found(path),
            _ => ReconcileError::from(e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap any reader, e.g. stdin or an in-memory buffer
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self {
            reader,
            headers: None,
        }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<EventRecord, ReconcileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.headers.is_none() {
            match self.reader.headers() {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => return Some(Err(e.into())),
            }
        }

        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e.into())),
        }

        // Quoted cells may span lines, so take the line the row starts on
        let line = record.position().map_or(0, |position| position.line());
        Some(
            record
                .deserialize::<CsvEventRecord>(self.headers.as_ref())
                .map_err(ReconcileError::from)
                .and_then(|csv_record| convert_csv_record(csv_record, line)),
        )
    }
}
