//! Columnar JSON event logs
//!
//! The log-fetch collaborator hands over the log as one JSON object with a
//! parallel array per column:
//!
//! ```json
//! {
//!   "id": [4710795078270976, 4710795078270976],
//!   "type": ["created", "failed"],
//!   "created": ["2023-11-09T14:38:23+00:00", "2023-11-09T14:38:41+00:00"],
//!   "errors": [[], ["Specified amount is zero"]]
//! }
//! ```
//!
//! Canonical column names (`transfer_id`, `event_type`, `created_at`) are
//! accepted too. Ids may be JSON numbers or strings. Row numbers in errors
//! are 0-based indexes into the columns.

use crate::io::csv_format::validate_event;
use crate::types::{EventLog, EventRecord, ReconcileError};
use serde::Deserialize;
use std::io::Read;

/// Transfer id as it appears in provider JSON
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawTransferId {
    Number(serde_json::Number),
    Text(String),
}

impl RawTransferId {
    fn into_string(self) -> String {
        match self {
            RawTransferId::Number(number) => number.to_string(),
            RawTransferId::Text(text) => text,
        }
    }
}

/// Columnar JSON event log
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JsonEventColumns {
    #[serde(alias = "id")]
    pub transfer_id: Vec<Option<RawTransferId>>,
    #[serde(alias = "type")]
    pub event_type: Vec<String>,
    #[serde(alias = "created")]
    pub created_at: Vec<String>,
    #[serde(default)]
    pub errors: Option<Vec<Option<Vec<String>>>>,
}

impl JsonEventColumns {
    /// Check column lengths and convert every row
    ///
    /// # Errors
    ///
    /// Fails on the first column whose length differs from `transfer_id`, or
    /// on the first row that does not validate.
    pub fn into_records(self) -> Result<Vec<EventRecord>, ReconcileError> {
        let expected = self.transfer_id.len();
        let check = |column: &str, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(ReconcileError::column_length_mismatch(column, expected, actual))
            }
        };
        check("event_type", self.event_type.len())?;
        check("created_at", self.created_at.len())?;
        if let Some(errors) = &self.errors {
            check("errors", errors.len())?;
        }

        let mut errors = self
            .errors
            .map(|column| column.into_iter())
            .into_iter()
            .flatten();

        self.transfer_id
            .into_iter()
            .zip(self.event_type)
            .zip(self.created_at)
            .enumerate()
            .map(|(row, ((transfer_id, event_type), created_at))| {
                let transfer_id = transfer_id.map(RawTransferId::into_string).unwrap_or_default();
                let messages = errors.next().flatten().unwrap_or_default();
                validate_event(&transfer_id, &event_type, &created_at, messages, row as u64)
            })
            .collect()
    }
}

/// Parse a columnar JSON log from a string
pub fn parse_json_log(data: &str) -> Result<EventLog, ReconcileError> {
    let columns: JsonEventColumns = serde_json::from_str(data)?;
    Ok(EventLog::new(columns.into_records()?))
}

/// Read and parse a columnar JSON log
pub fn read_json_log<R: Read>(reader: R) -> Result<EventLog, ReconcileError> {
    let columns: JsonEventColumns = serde_json::from_reader(reader)?;
    Ok(EventLog::new(columns.into_records()?))
}
