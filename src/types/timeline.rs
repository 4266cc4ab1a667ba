//! Per-stage projections, merged timelines, and per-transfer durations
//!
//! These are the intermediate tables flowing between the splitter, merger,
//! and duration calculator.

use super::event::{Stage, TransferId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of a stage projection
#[derive(Debug, Clone, PartialEq)]
pub struct StageEntry {
    pub transfer_id: TransferId,
    pub created_at: DateTime<Utc>,
    /// Only populated for the `failed` stage
    pub errors: Vec<String>,
}

/// Rows of the event log restricted to a single stage
///
/// At most one entry per transfer is expected; the splitter enforces this
/// according to the configured duplicate policy.
#[derive(Debug, Clone, PartialEq)]
pub struct StageProjection {
    pub stage: Stage,
    pub entries: Vec<StageEntry>,
}

impl StageProjection {
    pub fn empty(stage: Stage) -> Self {
        Self {
            stage,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One transfer's reconstructed lifecycle
///
/// Every stage the transfer never reached is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineRow {
    pub transfer_id: TransferId,
    pub created: Option<DateTime<Utc>>,
    pub sending: Option<DateTime<Utc>>,
    pub success: Option<DateTime<Utc>>,
    pub failed: Option<DateTime<Utc>>,
    pub refunded: Option<DateTime<Utc>>,
}

impl TimelineRow {
    pub fn new(transfer_id: TransferId) -> Self {
        Self {
            transfer_id,
            ..Default::default()
        }
    }

    /// Timestamp column for the given stage
    pub fn timestamp(&self, stage: Stage) -> Option<DateTime<Utc>> {
        match stage {
            Stage::Created => self.created,
            Stage::Sending => self.sending,
            Stage::Success => self.success,
            Stage::Failed => self.failed,
            Stage::Refunded => self.refunded,
        }
    }

    pub fn set_timestamp(&mut self, stage: Stage, value: DateTime<Utc>) {
        let slot = match stage {
            Stage::Created => &mut self.created,
            Stage::Sending => &mut self.sending,
            Stage::Success => &mut self.success,
            Stage::Failed => &mut self.failed,
            Stage::Refunded => &mut self.refunded,
        };
        *slot = Some(value);
    }
}

/// Merged timeline, one row per distinct transfer, sorted by transfer id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub rows: Vec<TimelineRow>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, transfer_id: &str) -> Option<&TimelineRow> {
        self.rows
            .binary_search_by(|row| row.transfer_id.as_str().cmp(transfer_id))
            .ok()
            .map(|index| &self.rows[index])
    }
}

/// Adjacent stage pairs whose elapsed time is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    CreatedToSending,
    SendingToSuccess,
    SendingToFailed,
    FailedToRefunded,
}

impl Leg {
    pub const ALL: [Leg; 4] = [
        Leg::CreatedToSending,
        Leg::SendingToSuccess,
        Leg::SendingToFailed,
        Leg::FailedToRefunded,
    ];

    /// (start, end) stages of this leg
    pub fn endpoints(self) -> (Stage, Stage) {
        match self {
            Leg::CreatedToSending => (Stage::Created, Stage::Sending),
            Leg::SendingToSuccess => (Stage::Sending, Stage::Success),
            Leg::SendingToFailed => (Stage::Sending, Stage::Failed),
            Leg::FailedToRefunded => (Stage::Failed, Stage::Refunded),
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            Leg::CreatedToSending => "created_to_sending",
            Leg::SendingToSuccess => "sending_to_success",
            Leg::SendingToFailed => "sending_to_failed",
            Leg::FailedToRefunded => "failed_to_refunded",
        }
    }

    fn index(self) -> usize {
        match self {
            Leg::CreatedToSending => 0,
            Leg::SendingToSuccess => 1,
            Leg::SendingToFailed => 2,
            Leg::FailedToRefunded => 3,
        }
    }
}

/// Elapsed seconds between lifecycle stages for one transfer
///
/// Legs with a missing endpoint are zero-filled in the public columns so
/// sums and means never see a gap. `measured` keeps the distinction between
/// "never reached" and a genuine zero-length transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationRow {
    pub transfer_id: TransferId,
    pub created_to_sending: f64,
    pub sending_to_success: f64,
    pub sending_to_failed: f64,
    pub failed_to_refunded: f64,
    pub total_time: f64,
    #[serde(skip)]
    measured: [bool; 4],
}

impl DurationRow {
    /// Build a row from raw leg measurements, zero-filling the gaps
    pub fn from_legs(transfer_id: TransferId, legs: [Option<f64>; 4]) -> Self {
        let value = |leg: Leg| legs[leg.index()].unwrap_or(0.0);
        let created_to_sending = value(Leg::CreatedToSending);
        let sending_to_success = value(Leg::SendingToSuccess);
        let sending_to_failed = value(Leg::SendingToFailed);
        let failed_to_refunded = value(Leg::FailedToRefunded);

        Self {
            transfer_id,
            created_to_sending,
            sending_to_success,
            sending_to_failed,
            failed_to_refunded,
            total_time: created_to_sending
                + sending_to_success
                + sending_to_failed
                + failed_to_refunded,
            measured: legs.map(|leg| leg.is_some()),
        }
    }

    /// Zero-filled value of a leg
    pub fn value(&self, leg: Leg) -> f64 {
        match leg {
            Leg::CreatedToSending => self.created_to_sending,
            Leg::SendingToSuccess => self.sending_to_success,
            Leg::SendingToFailed => self.sending_to_failed,
            Leg::FailedToRefunded => self.failed_to_refunded,
        }
    }

    /// Whether both endpoints of the leg were present
    pub fn measured(&self, leg: Leg) -> bool {
        self.measured[leg.index()]
    }

    /// Leg value, or `None` when the leg was never observed
    pub fn leg(&self, leg: Leg) -> Option<f64> {
        self.measured(leg).then(|| self.value(leg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_row_zero_fills_and_sums() {
        let row = DurationRow::from_legs("t1".to_string(), [Some(1.5), None, Some(8.0), None]);

        assert_eq!(row.created_to_sending, 1.5);
        assert_eq!(row.sending_to_success, 0.0);
        assert_eq!(row.sending_to_failed, 8.0);
        assert_eq!(row.failed_to_refunded, 0.0);
        assert_eq!(row.total_time, 9.5);
    }

    #[test]
    fn test_duration_row_distinguishes_zero_from_missing() {
        let row = DurationRow::from_legs("t1".to_string(), [Some(0.0), None, None, None]);

        assert_eq!(row.leg(Leg::CreatedToSending), Some(0.0));
        assert_eq!(row.leg(Leg::SendingToSuccess), None);
        assert!(row.measured(Leg::CreatedToSending));
        assert!(!row.measured(Leg::SendingToSuccess));
    }

    #[test]
    fn test_timeline_row_set_and_get() {
        let ts = Utc.with_ymd_and_hms(2023, 11, 9, 12, 0, 0).unwrap();
        let mut row = TimelineRow::new("t1".to_string());
        row.set_timestamp(Stage::Failed, ts);

        assert_eq!(row.timestamp(Stage::Failed), Some(ts));
        assert_eq!(row.timestamp(Stage::Created), None);
    }

    #[test]
    fn test_timeline_get_by_id() {
        let timeline = Timeline {
            rows: vec![
                TimelineRow::new("a".to_string()),
                TimelineRow::new("b".to_string()),
                TimelineRow::new("c".to_string()),
            ],
        };

        assert!(timeline.get("b").is_some());
        assert!(timeline.get("z").is_none());
    }
}
