//! Core reconciliation logic
//!
//! This module contains the pipeline components, leaf-first:
//! - `splitter` - Partition the event log into per-stage projections
//! - `merger` - Outer-join projections into one timeline per transfer
//! - `durations` - Elapsed seconds between adjacent stages
//! - `aggregator` - Success/failed cohort statistics
//! - `failures` - Error table for failed transfers
//! - `engine` - Pipeline orchestration and configuration

pub mod aggregator;
pub mod durations;
pub mod engine;
pub mod failures;
pub mod merger;
pub mod splitter;

pub use engine::{DuplicatePolicy, EngineConfig, ReconciliationEngine};
pub use merger::MergeOutput;
