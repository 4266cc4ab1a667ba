//! Rust Transfer Reconciler Library
//! # Overview
//!
//! This library reconciles the lifecycle events of money transfers
//! (`created`, `sending`, `success`, `failed`, `refunded`) into one timeline
//! per transfer, measures how long each transition took, and summarises the
//! success and failed cohorts. It reads CSV or columnar JSON event logs with
//! either a synchronous or an asynchronous batch-reading strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (EventRecord, TimelineRow, DurationRow, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Reconciliation pipeline:
//!   - [`core::splitter`] - Per-stage projections of the event log
//!   - [`core::merger`] - Outer join into the transfer timeline
//!   - [`core::durations`] - Stage-to-stage durations in seconds
//!   - [`core::aggregator`] - Cohort counts, percentages and means
//!   - [`core::failures`] - Error table of failed transfers
//!   - [`core::engine`] - Pipeline orchestration
//! - [`io`] - Event log readers, report files and console tables
//! - [`strategy`] - Sync and async loading strategies
//! - [`logging`] - tracing subscriber setup
//!
//! # Durations
//!
//! - `created_to_sending`: `created` → `sending`
//! - `sending_to_success`: `sending` → `success`
//! - `sending_to_failed`: `sending` → `failed`
//! - `failed_to_refunded`: `failed` → `refunded`
//! - `total_time`: sum of the four legs
//!
//! A leg with a missing endpoint contributes `0.0`.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rust_transfer_reconciler::{EventLog, EventRecord, ReconciliationEngine, Stage};
//!
//! let at = |s| Utc.with_ymd_and_hms(2023, 11, 9, 14, 0, s).unwrap();
//! let log = EventLog::new(vec![
//!     EventRecord::new("t1", Stage::Created, at(0)),
//!     EventRecord::new("t1", Stage::Sending, at(2)),
//!     EventRecord::new("t1", Stage::Success, at(7)),
//! ]);
//!
//! let report = ReconciliationEngine::default().run(&log).unwrap();
//! assert_eq!(report.success.count, 1);
//! assert_eq!(report.success.mean_total_time, Some(7.0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{DuplicatePolicy, EngineConfig, ReconciliationEngine};
pub use io::{write_durations_csv, ReportConfig, ReportWriter};
pub use types::{
    DurationRow, ErrorRow, EventLog, EventRecord, Outcome, OutcomeSummary, ReconcileError,
    ReconciliationReport, Stage, Timeline, TimelineRow, TransferId,
};
