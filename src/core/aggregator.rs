//! Aggregator
//!
//! Builds the success and failed cohort summaries from the per-transfer
//! durations. A transfer belongs to a cohort when its `sending_to_<outcome>`
//! leg is nonzero. Percentages depend on both cohorts and are applied once
//! both summaries exist.

use crate::types::{DurationRow, Leg, Outcome, OutcomeSummary};

fn outcome_leg(outcome: Outcome) -> Leg {
    match outcome {
        Outcome::Success => Leg::SendingToSuccess,
        Outcome::Failed => Leg::SendingToFailed,
    }
}

/// Arithmetic mean, `None` for an empty input
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Summarize one outcome cohort
///
/// The returned summary has `percentage` set to `0.0`; call
/// [`apply_percentages`] once both cohorts are known.
pub fn aggregate(durations: &[DurationRow], outcome: Outcome) -> OutcomeSummary {
    let leg = outcome_leg(outcome);
    let cohort: Vec<&DurationRow> = durations.iter().filter(|row| row.value(leg) != 0.0).collect();

    if cohort.is_empty() {
        return OutcomeSummary::empty(outcome);
    }

    let mean_failed_to_refunded = match outcome {
        Outcome::Failed => mean(cohort.iter().map(|row| row.failed_to_refunded)),
        Outcome::Success => None,
    };

    OutcomeSummary {
        outcome,
        count: cohort.len(),
        percentage: 0.0,
        mean_created_to_sending: mean(cohort.iter().map(|row| row.created_to_sending)),
        mean_stage_to_outcome: mean(cohort.iter().map(|row| row.value(leg))),
        mean_total_time: mean(cohort.iter().map(|row| row.total_time)),
        mean_failed_to_refunded,
    }
}

/// Fill in each cohort's share of `success_count + failed_count`
///
/// When both cohorts are empty both percentages are `0.0`.
pub fn apply_percentages(success: &mut OutcomeSummary, failed: &mut OutcomeSummary) {
    let total = success.count + failed.count;
    if total == 0 {
        success.percentage = 0.0;
        failed.percentage = 0.0;
        return;
    }

    success.percentage = success.count as f64 * 100.0 / total as f64;
    failed.percentage = failed.count as f64 * 100.0 / total as f64;
}

/// Build both cohort summaries with percentages applied
pub fn summarize(durations: &[DurationRow]) -> (OutcomeSummary, OutcomeSummary) {
    let mut success = aggregate(durations, Outcome::Success);
    let mut failed = aggregate(durations, Outcome::Failed);
    apply_percentages(&mut success, &mut failed);
    (success, failed)
}
