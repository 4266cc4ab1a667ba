//! Processing strategy module
//!
//! This module defines the Strategy pattern for the complete reconciliation
//! run: loading the event log from disk and feeding it to the engine. Loading
//! can be synchronous or asynchronous; reconciliation itself is always the
//! same single-threaded engine.

use crate::cli::StrategyType;
use crate::core::{EngineConfig, ReconciliationEngine};
use crate::io::InputFormat;
use crate::types::{EventLog, ReconcileError, ReconciliationReport};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Options for a single reconciliation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Input format; guessed from the file extension when `None`
    pub format: Option<InputFormat>,
    /// Only reconcile events recorded on this UTC day
    pub day: Option<NaiveDate>,
    pub engine: EngineConfig,
}

impl RunOptions {
    pub fn format_for(&self, input_path: &Path) -> InputFormat {
        self.format
            .unwrap_or_else(|| InputFormat::from_path(input_path))
    }
}

/// Processing strategy trait for complete reconciliation runs
pub trait ProcessingStrategy: Send + Sync {
    /// Load and validate the whole event log
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or if any
    /// event fails validation. No partial log is returned.
    fn load_events(&self, input_path: &Path, format: InputFormat)
        -> Result<EventLog, ReconcileError>;

    /// Load the event log and reconcile it
    fn process(
        &self,
        input_path: &Path,
        options: &RunOptions,
    ) -> Result<ReconciliationReport, ReconcileError> {
        let format = options.format_for(input_path);
        let mut log = self.load_events(input_path, format)?;
        info!(events = log.len(), ?format, path = %input_path.display(), "event log loaded");

        if let Some(day) = options.day {
            log.retain_day(day);
            info!(events = log.len(), %day, "restricted to day");
        }

        ReconciliationEngine::new(options.engine).run(&log)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
