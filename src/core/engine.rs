//! Reconciliation engine
//!
//! This module provides the `ReconciliationEngine` that chains the pipeline
//! components over one finite event log:
//!
//! ```text
//! EventLog → splitter → merger → durations → aggregator → ReconciliationReport
//!                          └──────→ failures (error table) ─────┘
//! ```
//!
//! Every step is a pure, synchronous transformation. The engine never
//! blocks waiting for more events: a log with transfers still in flight
//! produces a best-effort report in which those transfers belong to no
//! cohort.

use crate::core::{aggregator, durations, failures, merger, splitter};
use crate::types::{EventLog, ReconcileError, ReconciliationReport};
use tracing::{info, info_span};

/// What to do when a transfer emits the same stage more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the event with the earliest timestamp and log a warning
    #[default]
    KeepEarliest,

    /// Fail the run with `ReconcileError::DuplicateStage`
    Reject,
}

/// Engine configuration, built once at startup by the CLI layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub duplicate_stage: DuplicatePolicy,
}

/// Reconciliation pipeline entry point
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: EngineConfig,
}

impl ReconciliationEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Reconcile an event log into aggregate summaries and an error table
    ///
    /// Running the engine twice on the same log yields identical reports.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStage` when the log repeats a stage for a transfer
    /// and the engine is configured with `DuplicatePolicy::Reject`.
    pub fn run(&self, log: &EventLog) -> Result<ReconciliationReport, ReconcileError> {
        let _span = info_span!("reconcile", events = log.len()).entered();

        let projections = splitter::split_all(log, self.config.duplicate_stage)?;
        let merged = merger::merge_projections(&projections);
        let durations = durations::compute_durations(&merged.timeline);
        let (success, failed) = aggregator::summarize(&durations);
        let errors = failures::extract_errors(merged.failed_log);

        info!(
            transfers = merged.timeline.len(),
            success = success.count,
            failed = failed.count,
            error_messages = failures::distinct_messages(&errors),
            "reconciliation complete"
        );

        Ok(ReconciliationReport {
            success,
            failed,
            errors,
            durations,
        })
    }
}
