//! Aggregate summaries and the reconciliation report handed to writers

use super::event::{Outcome, TransferId};
use super::timeline::DurationRow;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Count, share, and mean durations for one outcome cohort
///
/// Means are `None` when the cohort is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSummary {
    pub outcome: Outcome,

    /// Transfers that reached the outcome from `sending`
    pub count: usize,

    /// Share of this cohort among both cohorts, in percent
    ///
    /// `0.0` when neither cohort has any transfer.
    pub percentage: f64,

    pub mean_created_to_sending: Option<f64>,

    /// Mean of `sending_to_success` or `sending_to_failed`
    pub mean_stage_to_outcome: Option<f64>,

    pub mean_total_time: Option<f64>,

    /// Only populated for the failed cohort
    pub mean_failed_to_refunded: Option<f64>,
}

impl OutcomeSummary {
    /// Zero-count summary with undefined means
    pub fn empty(outcome: Outcome) -> Self {
        Self {
            outcome,
            count: 0,
            percentage: 0.0,
            mean_created_to_sending: None,
            mean_stage_to_outcome: None,
            mean_total_time: None,
            mean_failed_to_refunded: None,
        }
    }

    /// Whether every column has a defined value
    pub fn is_complete(&self) -> bool {
        self.count > 0
    }

    /// Output columns in report order
    ///
    /// Success: `success_count, success_percentage, mean_created_to_sending,
    /// mean_sending_to_success, mean_total_time`.
    /// Failed: `failed_count, failed_percentage, mean_created_to_sending,
    /// mean_failed_to_refunded, mean_sending_to_failed, mean_total_time`.
    pub fn columns(&self) -> Vec<(String, Value)> {
        let name = self.outcome.as_str();
        let mut columns = vec![
            (format!("{name}_count"), Value::from(self.count)),
            (format!("{name}_percentage"), Value::from(self.percentage)),
            (
                "mean_created_to_sending".to_string(),
                Value::from(self.mean_created_to_sending),
            ),
        ];

        if self.outcome == Outcome::Failed {
            columns.push((
                "mean_failed_to_refunded".to_string(),
                Value::from(self.mean_failed_to_refunded),
            ));
        }

        columns.push((
            format!("mean_sending_to_{name}"),
            Value::from(self.mean_stage_to_outcome),
        ));
        columns.push((
            "mean_total_time".to_string(),
            Value::from(self.mean_total_time),
        ));

        columns
    }
}

impl Serialize for OutcomeSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (key, value) in &columns {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Error messages of one failed transfer
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorRow {
    pub transfer_id: TransferId,
    pub errors: Vec<String>,
}

/// Everything one reconciliation run produces
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub success: OutcomeSummary,
    pub failed: OutcomeSummary,
    pub errors: Vec<ErrorRow>,

    /// Per-transfer durations, sorted by transfer id
    pub durations: Vec<DurationRow>,
}
