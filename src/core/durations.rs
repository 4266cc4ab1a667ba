//! Duration calculator
//!
//! Derives elapsed seconds between adjacent lifecycle stages for every row of
//! the merged timeline. A leg with a missing endpoint is zero-filled and
//! `total_time` sums the four zero-filled legs. Negative durations caused by
//! out-of-order timestamps are passed through unchanged.

use crate::types::{DurationRow, Leg, Timeline, TimelineRow};
use chrono::{DateTime, Utc};

/// Elapsed seconds from `start` to `end`, with nanosecond precision
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    if let Some(nanos) = delta.num_nanoseconds() {
        return nanos as f64 / 1_000_000_000.0;
    }
    // Spans beyond ~292 years overflow nanoseconds
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Compute the duration row of a single transfer
pub fn duration_row(row: &TimelineRow) -> DurationRow {
    let legs = Leg::ALL.map(|leg| {
        let (start, end) = leg.endpoints();
        match (row.timestamp(start), row.timestamp(end)) {
            (Some(start), Some(end)) => Some(seconds_between(start, end)),
            _ => None,
        }
    });

    DurationRow::from_legs(row.transfer_id.clone(), legs)
}

/// Compute duration rows for the whole timeline, preserving row order
pub fn compute_durations(timeline: &Timeline) -> Vec<DurationRow> {
    timeline.rows.iter().map(duration_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stage;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rstest::rstest;

    fn t(offset_ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 9, 14, 0, 0).unwrap() + Duration::milliseconds(offset_ms)
    }

    fn row(stages: &[(Stage, i64)]) -> TimelineRow {
        let mut row = TimelineRow::new("t1".to_string());
        for &(stage, offset_ms) in stages {
            row.set_timestamp(stage, t(offset_ms));
        }
        row
    }

    #[test]
    fn test_success_path() {
        let durations = duration_row(&row(&[
            (Stage::Created, 0),
            (Stage::Sending, 1_000),
            (Stage::Success, 5_000),
        ]));

        assert_eq!(durations.created_to_sending, 1.0);
        assert_eq!(durations.sending_to_success, 4.0);
        assert_eq!(durations.sending_to_failed, 0.0);
        assert_eq!(durations.failed_to_refunded, 0.0);
        assert_eq!(durations.total_time, 5.0);
    }

    #[test]
    fn test_failed_path_without_refund() {
        let durations = duration_row(&row(&[
            (Stage::Created, 0),
            (Stage::Sending, 2_000),
            (Stage::Failed, 10_000),
        ]));

        assert_eq!(durations.created_to_sending, 2.0);
        assert_eq!(durations.sending_to_failed, 8.0);
        assert_eq!(durations.failed_to_refunded, 0.0);
        assert_eq!(durations.total_time, 10.0);
        assert!(!durations.measured(Leg::FailedToRefunded));
    }

    #[test]
    fn test_failed_without_sending_contributes_nothing_to_failure_legs() {
        let durations = duration_row(&row(&[
            (Stage::Created, 0),
            (Stage::Failed, 3_000),
            (Stage::Refunded, 4_500),
        ]));

        assert_eq!(durations.sending_to_failed, 0.0);
        assert_eq!(durations.failed_to_refunded, 1.5);
        assert_eq!(durations.total_time, 1.5);
    }

    #[rstest]
    #[case::subsecond(0, 250, 0.25)]
    #[case::negative(5_000, 2_000, -3.0)]
    #[case::zero(1_000, 1_000, 0.0)]
    fn test_seconds_between(#[case] start_ms: i64, #[case] end_ms: i64, #[case] expected: f64) {
        assert_eq!(seconds_between(t(start_ms), t(end_ms)), expected);
    }

    #[test]
    fn test_seconds_between_keeps_nanoseconds() {
        let start = t(0);
        let end = start + Duration::nanoseconds(1_500);

        assert_eq!(seconds_between(start, end), 0.0000015);
    }

    #[test]
    fn test_compute_durations_preserves_order() {
        let timeline = Timeline {
            rows: vec![
                TimelineRow::new("a".to_string()),
                TimelineRow::new("b".to_string()),
            ],
        };

        let ids: Vec<_> = compute_durations(&timeline)
            .into_iter()
            .map(|d| d.transfer_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_total_time_is_sum_of_legs(
            offsets in proptest::collection::vec(proptest::option::of(-100_000i64..100_000), 5)
        ) {
            let mut timeline_row = TimelineRow::new("p".to_string());
            for (stage, offset) in Stage::ALL.iter().zip(&offsets) {
                if let Some(ms) = offset {
                    timeline_row.set_timestamp(*stage, t(*ms));
                }
            }

            let d = duration_row(&timeline_row);
            let sum = d.created_to_sending + d.sending_to_success
                + d.sending_to_failed + d.failed_to_refunded;
            prop_assert_eq!(d.total_time, sum);
        }
    }
}
