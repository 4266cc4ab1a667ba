//! Transfer Reconciler CLI
//!
//! Command-line interface for reconciling transfer lifecycle logs.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.csv
//! cargo run -- --strategy async --batch-size 2000 --workers 8 events.csv
//! cargo run -- --date 2023-11-09 --durations durations.csv logs.json
//! PIX_QTD=50 cargo run -- --output-dir reports events.csv
//! ```
//!
//! The program reads the event log, reconciles it with the selected loading
//! strategy, prints the cohort tables and the failed log to stdout, and writes
//! `success.json`, `failed.json` and `errors.json` under
//! `<output-dir>/<date>/<run folder>/`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid event, report not writable, etc.)

use chrono::Local;
use rust_transfer_reconciler::cli::{self, CliArgs};
use rust_transfer_reconciler::io::console;
use rust_transfer_reconciler::logging::{init_logging, LogConfig};
use rust_transfer_reconciler::{strategy, write_durations_csv, ReconcileError, ReportWriter};
use std::fs::File;
use std::io::BufWriter;
use std::process;
use tracing::{error, info};

fn main() {
    let args = cli::parse_args();

    if let Err(e) = init_logging(&LogConfig::from_verbosity(args.verbose)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run(&args) {
        error!(error = %e, "reconciliation failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), ReconcileError> {
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let report = strategy.process(&args.input_file, &args.to_run_options())?;

    let report_config = args.to_report_config();
    if report_config.print_tables {
        console::print_report(&report);
    }

    if !args.no_write {
        let written = ReportWriter::new(report_config).write(&report, Local::now().naive_local())?;
        info!(directory = %written.directory.display(), "report saved");
    }

    if let Some(path) = &args.durations {
        let file = File::create(path).map_err(|e| {
            ReconcileError::report(format!("Failed to create '{}': {}", path.display(), e))
        })?;
        write_durations_csv(&report.durations, &mut BufWriter::new(file))?;
        info!(path = %path.display(), rows = report.durations.len(), "durations exported");
    }

    Ok(())
}
