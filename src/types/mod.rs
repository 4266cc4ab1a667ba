//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `event`: Lifecycle stages, event records, and the normalized event log
//! - `timeline`: Stage projections, merged timelines, and duration rows
//! - `summary`: Aggregate summaries, error rows, and the final report
//! - `error`: Error types for the reconciler

pub mod error;
pub mod event;
pub mod summary;
pub mod timeline;

pub use error::ReconcileError;
pub use event::{EventLog, EventRecord, Outcome, Stage, TransferId};
pub use summary::{ErrorRow, OutcomeSummary, ReconciliationReport};
pub use timeline::{DurationRow, Leg, StageEntry, StageProjection, Timeline, TimelineRow};
