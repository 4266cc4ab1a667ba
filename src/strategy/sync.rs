//! Synchronous processing strategy
//!
//! Loads the event log on the calling thread: CSV through the streaming
//! `SyncReader`, JSON through `serde_json::from_reader`. The first invalid
//! event aborts the load.

use crate::io::json_format::read_json_log;
use crate::io::sync_reader::SyncReader;
use crate::io::InputFormat;
use crate::strategy::ProcessingStrategy;
use crate::types::{EventLog, ReconcileError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_transfer_reconciler::strategy::{ProcessingStrategy, RunOptions, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let report = SyncProcessingStrategy
///     .process(Path::new("events.csv"), &RunOptions::default())
///     .expect("Reconciliation failed");
/// println!("{} succeeded", report.success.count);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn load_events(
        &self,
        input_path: &Path,
        format: InputFormat,
    ) -> Result<EventLog, ReconcileError> {
        match format {
            InputFormat::Csv => SyncReader::new(input_path)?.collect(),
            InputFormat::Json => {
                let file = File::open(input_path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ReconcileError::file_not_found(input_path),
                    _ => ReconcileError::from(e),
                })?;
                read_json_log(BufReader::new(file))
            }
        }
    }
}
