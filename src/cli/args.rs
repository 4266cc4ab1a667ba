use crate::core::{DuplicatePolicy, EngineConfig};
use crate::io::{InputFormat, ReportConfig};
use crate::strategy::{BatchConfig, RunOptions};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Reconcile transfer lifecycle events into timing metrics
#[derive(Parser, Debug)]
#[command(name = "transfer-reconciler")]
#[command(
    about = "Reconcile transfer lifecycle events into timing metrics and a failure report",
    long_about = None
)]
pub struct CliArgs {
    /// Input event log (CSV or columnar JSON)
    #[arg(value_name = "INPUT", help = "Path to the input event log")]
    pub input_file: PathBuf,

    /// Loading strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        env = "RECONCILER_STRATEGY",
        help = "Loading strategy: 'sync' for synchronous or 'async' for batched asynchronous reading"
    )]
    pub strategy: StrategyType,

    /// Input format; guessed from the file extension when omitted
    #[arg(long = "format", value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Number of events per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of events per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of tokio worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Only reconcile events recorded on this UTC day
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Fail on a transfer that reports the same stage twice
    #[arg(long = "reject-duplicates")]
    pub reject_duplicates: bool,

    /// Root directory of the JSON report files
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = "report_file",
        env = "REPORT_DIR"
    )]
    pub output_dir: PathBuf,

    /// Cohort size above which the run is filed as a completed period
    #[arg(
        long = "pix-qtd",
        value_name = "COUNT",
        default_value_t = 10,
        env = "PIX_QTD"
    )]
    pub completed_period_threshold: usize,

    /// Write the per-transfer duration table as CSV
    #[arg(long = "durations", value_name = "PATH")]
    pub durations: Option<PathBuf>,

    /// Do not print the report tables
    #[arg(long = "no-print")]
    pub no_print: bool,

    /// Do not write the JSON report files
    #[arg(long = "no-write")]
    pub no_write: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available loading strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use defaults; zero values are replaced by
    /// `BatchConfig::new` with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            duplicate_stage: if self.reject_duplicates {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::KeepEarliest
            },
        }
    }

    pub fn to_report_config(&self) -> ReportConfig {
        ReportConfig {
            output_root: self.output_dir.clone(),
            completed_period_threshold: self.completed_period_threshold,
            print_tables: !self.no_print,
        }
    }

    pub fn to_run_options(&self) -> RunOptions {
        RunOptions {
            format: self.format,
            day: self.date,
            engine: self.to_engine_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::no_options(&["program", "input.csv"], None, None)]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.csv"], Some(2000), None)]
    #[case::workers(&["program", "--workers", "8", "input.csv"], None, Some(8))]
    #[case::all_options(
        &["program", "--strategy", "async", "--batch-size", "2000", "--workers", "8", "input.csv"],
        Some(2000),
        Some(8)
    )]
    fn test_batch_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] workers: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.worker_threads, workers);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_workers(&["program", "--workers", "8", "input.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_workers(&["program", "--workers", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_workers: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.worker_threads, expected_workers);
    }

    #[rstest]
    #[case::keep_earliest(&["program", "input.csv"], DuplicatePolicy::KeepEarliest)]
    #[case::reject(&["program", "--reject-duplicates", "input.csv"], DuplicatePolicy::Reject)]
    fn test_engine_config_conversion(#[case] args: &[&str], #[case] expected: DuplicatePolicy) {
        let config = CliArgs::try_parse_from(args).unwrap().to_engine_config();
        assert_eq!(config.duplicate_stage, expected);
    }

    #[test]
    fn test_report_config_conversion() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--output-dir",
            "out",
            "--pix-qtd",
            "25",
            "--no-print",
            "input.csv",
        ])
        .unwrap();

        assert_eq!(
            parsed.to_report_config(),
            ReportConfig {
                output_root: PathBuf::from("out"),
                completed_period_threshold: 25,
                print_tables: false,
            }
        );
    }

    #[test]
    fn test_run_options_conversion() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--format",
            "json",
            "--date",
            "2023-11-09",
            "input.log",
        ])
        .unwrap();

        let options = parsed.to_run_options();

        assert_eq!(options.format, Some(InputFormat::Json));
        assert_eq!(options.day, NaiveDate::from_ymd_opt(2023, 11, 9));
        assert_eq!(options.engine, EngineConfig::default());
    }

    #[rstest]
    #[case::none(&["program", "input.csv"], 0)]
    #[case::one(&["program", "-v", "input.csv"], 1)]
    #[case::three(&["program", "-vvv", "input.csv"], 3)]
    fn test_verbosity_count(#[case] args: &[&str], #[case] expected: u8) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().verbose, expected);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_format(&["program", "--format", "xml", "input.csv"])]
    #[case::invalid_date(&["program", "--date", "09/11/2023", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
