//! Asynchronous CSV reader with batch interface
//!
//! Reads event records from a CSV source in batches using csv-async.
//! Unlike a lenient reader, the first invalid row ends the read with an
//! error: a batch containing malformed events must not be reconciled.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of EventRecords
//!                  ↓
//!           csv_format module
//!           (CsvEventRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvEventRecord};
use crate::types::{EventRecord, ReconcileError};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
        }
    }

    /// Read up to `batch_size` validated event records
    ///
    /// Returns an empty vector once the end of the input is reached.
    ///
    /// # Errors
    ///
    /// Returns the first parse or validation error encountered, with the
    /// file line the offending row starts on.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<EventRecord>, ReconcileError> {
        if self.headers.is_none() {
            self.headers = Some(self.csv_reader.headers().await?.clone());
        }

        // An empty batch means end of input, so always read at least one row
        let batch_size = batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let mut record = StringRecord::new();

        while batch.len() < batch_size {
            if !self.csv_reader.read_record(&mut record).await? {
                break;
            }
            let line = record.position().map_or(0, |position| position.line());
            let csv_record: CsvEventRecord = record.deserialize(self.headers.as_ref())?;
            batch.push(convert_csv_record(csv_record, line)?);
        }

        Ok(batch)
    }
}
