//! Asynchronous batch-reading strategy
//!
//! Loads the event log on a tokio multi-threaded runtime: CSV is read in
//! batches through `AsyncReader`, JSON is read with `tokio::fs::read` and
//! parsed in one go. The loaded log is then reconciled by the same
//! synchronous engine as the sync strategy.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch CSV reading)
//!     └── ReconciliationEngine (single-threaded)
//! ```

use crate::io::async_reader::AsyncReader;
use crate::io::json_format::parse_json_log;
use crate::io::InputFormat;
use crate::strategy::ProcessingStrategy;
use crate::types::{EventLog, ReconcileError};
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for batch reading
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of events per batch
    pub batch_size: usize,
    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch-reading strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create the strategy; zero settings are replaced by defaults
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config: BatchConfig::new(config.batch_size, config.worker_threads),
        }
    }

    async fn load_csv(&self, input_path: &Path) -> Result<EventLog, ReconcileError> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| open_error(input_path, e))?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut records = Vec::new();
        loop {
            let batch = reader.read_batch(self.config.batch_size).await?;
            if batch.is_empty() {
                break;
            }
            debug!(batch = batch.len(), total = records.len() + batch.len(), "read batch");
            records.extend(batch);
        }

        Ok(EventLog::new(records))
    }

    async fn load_json(&self, input_path: &Path) -> Result<EventLog, ReconcileError> {
        let data = tokio::fs::read_to_string(input_path)
            .await
            .map_err(|e| open_error(input_path, e))?;
        parse_json_log(&data)
    }
}

fn open_error(path: &Path, error: std::io::Error) -> ReconcileError {
    match error.kind() {
        std::io::ErrorKind::NotFound => ReconcileError::file_not_found(path),
        _ => ReconcileError::from(error),
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn load_events(
        &self,
        input_path: &Path,
        format: InputFormat,
    ) -> Result<EventLog, ReconcileError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| ReconcileError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            match format {
                InputFormat::Csv => self.load_csv(input_path).await,
                InputFormat::Json => self.load_json(input_path).await,
            }
        })
    }
}
