//! CSV format handling for event records and duration output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvEventRecord structure for deserialization
//! - Validation and conversion from raw rows to domain types
//! - Timestamp and error-list parsing shared with the JSON format
//! - Per-transfer duration output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{DurationRow, EventRecord, Leg, ReconcileError, Stage};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::Write;

/// Separator between messages in the CSV `errors` cell
pub const ERRORS_SEPARATOR: char = '|';

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: transfer_id, event_type,
/// created_at, errors. The legacy column names `id`, `type`, and `created`
/// are accepted as aliases. `errors` may be absent or empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvEventRecord {
    #[serde(alias = "id")]
    pub transfer_id: String,
    #[serde(alias = "type")]
    pub event_type: String,
    #[serde(alias = "created")]
    pub created_at: String,
    #[serde(default)]
    pub errors: Option<String>,
}

/// Parse an ISO timestamp into UTC
///
/// Accepts RFC 3339 with an offset, or a naive date-time (space or `T`
/// separated, optional fractional seconds) which is taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Provider SDKs print offsets with a space separator
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Split a `|`-separated errors cell into messages
pub fn parse_errors(cell: Option<&str>) -> Vec<String> {
    cell.map(|cell| {
        cell.split(ERRORS_SEPARATOR)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Validate raw field values and build an EventRecord
///
/// Shared by the CSV and JSON formats. `row` locates the event in the input
/// for error messages.
///
/// # Errors
///
/// - `MissingTransferId` if the id is empty
/// - `InvalidEventType` if the type is not one of the five stages
/// - `InvalidTimestamp` if the timestamp is not ISO-parseable
pub fn validate_event(
    transfer_id: &str,
    event_type: &str,
    created_at: &str,
    errors: Vec<String>,
    row: u64,
) -> Result<EventRecord, ReconcileError> {
    let transfer_id = transfer_id.trim();
    if transfer_id.is_empty() {
        return Err(ReconcileError::missing_transfer_id(row));
    }

    let event_type: Stage = event_type
        .parse()
        .map_err(|_| ReconcileError::invalid_event_type(event_type.trim(), row))?;

    let created_at = parse_timestamp(created_at)
        .ok_or_else(|| ReconcileError::invalid_timestamp(created_at.trim(), row))?;

    Ok(EventRecord::new(transfer_id, event_type, created_at).with_errors(errors))
}

/// Convert a CsvEventRecord to an EventRecord
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
/// * `line` - 1-based line number of the record (header is line 1)
pub fn convert_csv_record(
    csv_record: CsvEventRecord,
    line: u64,
) -> Result<EventRecord, ReconcileError> {
    let errors = parse_errors(csv_record.errors.as_deref());
    validate_event(
        &csv_record.transfer_id,
        &csv_record.event_type,
        &csv_record.created_at,
        errors,
        line,
    )
}

/// Write per-transfer durations in CSV format
///
/// Columns: transfer_id, created_to_sending, sending_to_success,
/// sending_to_failed, failed_to_refunded, total_time. Rows are written in the
/// order given (the engine sorts them by transfer id).
pub fn write_durations_csv(
    rows: &[DurationRow],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = csv::Writer::from_writer(output);

    let mut header = vec!["transfer_id"];
    header.extend(Leg::ALL.map(Leg::column_name));
    header.push("total_time");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.transfer_id.clone()];
        record.extend(Leg::ALL.map(|leg| row.value(leg).to_string()));
        record.push(row.total_time.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn record(transfer_id: &str, event_type: &str, created_at: &str) -> CsvEventRecord {
        CsvEventRecord {
            transfer_id: transfer_id.to_string(),
            event_type: event_type.to_string(),
            created_at: created_at.to_string(),
            errors: None,
        }
    }

    #[rstest]
    #[case::rfc3339_utc("2023-11-09T14:38:23Z", 0)]
    #[case::rfc3339_offset("2023-11-09T11:38:23-03:00", 0)]
    #[case::fractional("2023-11-09T14:38:23.500000+00:00", 500)]
    #[case::space_offset("2023-11-09 14:38:23.5+00:00", 500)]
    #[case::naive_space("2023-11-09 14:38:23", 0)]
    #[case::naive_t("2023-11-09T14:38:23.25", 250)]
    fn test_parse_timestamp(#[case] input: &str, #[case] millis: u32) {
        let expected = Utc.with_ymd_and_hms(2023, 11, 9, 14, 38, 23).unwrap()
            + chrono::Duration::milliseconds(millis as i64);
        assert_eq!(parse_timestamp(input), Some(expected));
    }

    #[rstest]
    #[case("yesterday")]
    #[case("")]
    #[case("2023-13-40 00:00:00")]
    fn test_parse_timestamp_rejects(#[case] input: &str) {
        assert_eq!(parse_timestamp(input), None);
    }

    #[rstest]
    #[case(None, vec![])]
    #[case(Some(""), vec![])]
    #[case(Some("Specified amount is zero"), vec!["Specified amount is zero"])]
    #[case(Some(" a | b |"), vec!["a", "b"])]
    fn test_parse_errors(#[case] cell: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(parse_errors(cell), expected);
    }

    #[test]
    fn test_convert_csv_record_valid() {
        let mut csv_record = record("4710795078270976", "FAILED", "2023-11-09T14:38:23Z");
        csv_record.errors = Some("Target account is closed".to_string());

        let event = convert_csv_record(csv_record, 2).unwrap();

        assert_eq!(event.transfer_id, "4710795078270976");
        assert_eq!(event.event_type, Stage::Failed);
        assert_eq!(event.errors, vec!["Target account is closed"]);
    }

    #[rstest]
    #[case::missing_id(
        record("  ", "created", "2023-11-09T14:38:23Z"),
        ReconcileError::MissingTransferId { row: 5 }
    )]
    #[case::invalid_type(
        record("t1", "canceled", "2023-11-09T14:38:23Z"),
        ReconcileError::InvalidEventType { event_type: "canceled".to_string(), row: 5 }
    )]
    #[case::invalid_timestamp(
        record("t1", "created", "not a date"),
        ReconcileError::InvalidTimestamp { value: "not a date".to_string(), row: 5 }
    )]
    fn test_convert_csv_record_errors(
        #[case] csv_record: CsvEventRecord,
        #[case] expected: ReconcileError,
    ) {
        assert_eq!(convert_csv_record(csv_record, 5).unwrap_err(), expected);
    }

    #[test]
    fn test_legacy_header_aliases() {
        let data = "id,type,created,errors\nt1,created,2023-11-09T14:38:23Z,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<CsvEventRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transfer_id, "t1");
        assert_eq!(rows[0].event_type, "created");
    }

    #[rstest]
    #[case::empty(vec![], "transfer_id,created_to_sending,sending_to_success,sending_to_failed,failed_to_refunded,total_time\n")]
    #[case::single_row(
        vec![DurationRow::from_legs("t1".to_string(), [Some(1.0), Some(4.5), None, None])],
        "transfer_id,created_to_sending,sending_to_success,sending_to_failed,failed_to_refunded,total_time\n\
         t1,1,4.5,0,0,5.5\n"
    )]
    fn test_write_durations_csv(#[case] rows: Vec<DurationRow>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_durations_csv(&rows, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }
}
