//! Timeline merger
//!
//! Outer-joins the stage projections on transfer id. The `created`
//! projection is the base; every later stage contributes its own timestamp
//! column (`created_at_<stage>`). Transfers seen in any projection get a row,
//! with `None` for the stages they never reached.
//!
//! While the `failed` projection is joined, its `{transfer_id, errors}`
//! columns are captured for the error extractor.

use crate::types::{ErrorRow, Stage, StageProjection, Timeline, TimelineRow, TransferId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Merged timeline plus the failed-stage error capture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutput {
    pub timeline: Timeline,
    pub failed_log: Vec<ErrorRow>,
}

/// Outer-join one projection into the partially merged timeline
///
/// Rows already present gain the projection's timestamp column; transfers
/// new to the timeline are inserted with every other stage unset.
pub fn outer_join(rows: &mut BTreeMap<TransferId, TimelineRow>, projection: &StageProjection) {
    let column = projection.stage.timestamp_column();
    let mut inserted = 0usize;

    for entry in &projection.entries {
        let row = rows.entry(entry.transfer_id.clone()).or_insert_with(|| {
            inserted += 1;
            TimelineRow::new(entry.transfer_id.clone())
        });
        row.set_timestamp(projection.stage, entry.created_at);
    }

    debug!(
        %column,
        joined = projection.len(),
        new_rows = inserted,
        total_rows = rows.len(),
        "outer join"
    );
}

/// Merge every stage projection into one timeline
///
/// Projections are joined in the order given, which is `Stage::ALL` when
/// they come from the splitter. Rows are sorted by transfer id.
pub fn merge_projections(projections: &[StageProjection]) -> MergeOutput {
    let mut rows: BTreeMap<TransferId, TimelineRow> = BTreeMap::new();
    let mut failed_log = Vec::new();

    for projection in projections {
        if projection.stage == Stage::Failed {
            failed_log = projection
                .entries
                .iter()
                .map(|entry| ErrorRow {
                    transfer_id: entry.transfer_id.clone(),
                    errors: entry.errors.clone(),
                })
                .collect();
        }
        outer_join(&mut rows, projection);
    }

    let without_created = rows.values().filter(|row| row.created.is_none()).count();
    if without_created > 0 {
        warn!(
            transfers = without_created,
            "transfers without a created event, log may be incomplete"
        );
    }

    MergeOutput {
        timeline: Timeline {
            rows: rows.into_values().collect(),
        },
        failed_log,
    }
}
