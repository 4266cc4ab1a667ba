//! Event splitter
//!
//! Partitions the normalized event log into one projection per lifecycle
//! stage. Each projection keeps `transfer_id` and `created_at`, plus the
//! error messages for the `failed` stage only.

use crate::core::engine::DuplicatePolicy;
use crate::types::{EventLog, ReconcileError, Stage, StageEntry, StageProjection};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Project the rows of a single stage
///
/// A stage with no matching events yields an empty projection. When a
/// transfer appears twice for the same stage the configured policy decides
/// whether the earliest event is kept or the batch is rejected.
///
/// # Errors
///
/// Returns `DuplicateStage` under `DuplicatePolicy::Reject`.
pub fn split_stage(
    log: &EventLog,
    stage: Stage,
    policy: DuplicatePolicy,
) -> Result<StageProjection, ReconcileError> {
    let mut projection = StageProjection::empty(stage);
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in log.records().iter().filter(|r| r.event_type == stage) {
        let errors = if stage == Stage::Failed {
            record.errors.clone()
        } else {
            Vec::new()
        };

        if let Some(&index) = positions.get(record.transfer_id.as_str()) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ReconcileError::duplicate_stage(&record.transfer_id, stage));
                }
                DuplicatePolicy::KeepEarliest => {
                    warn!(
                        transfer_id = %record.transfer_id,
                        %stage,
                        "duplicate stage event, keeping the earliest"
                    );
                    let existing = &mut projection.entries[index];
                    if record.created_at < existing.created_at {
                        existing.created_at = record.created_at;
                        existing.errors = errors;
                    }
                    continue;
                }
            }
        }

        positions.insert(record.transfer_id.as_str(), projection.entries.len());
        projection.entries.push(StageEntry {
            transfer_id: record.transfer_id.clone(),
            created_at: record.created_at,
            errors,
        });
    }

    debug!(%stage, rows = projection.len(), "split stage projection");
    Ok(projection)
}

/// Split the log into every stage projection, in merge order
pub fn split_all(
    log: &EventLog,
    policy: DuplicatePolicy,
) -> Result<Vec<StageProjection>, ReconcileError> {
    Stage::ALL
        .iter()
        .map(|&stage| split_stage(log, stage, policy))
        .collect()
}
