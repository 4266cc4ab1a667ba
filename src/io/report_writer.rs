//! Report persistence
//!
//! Writes the reconciliation report as JSON record files under a dated
//! directory layout:
//!
//! ```text
//! <output_root>/<YYYY-MM-DD>/<run folder>/success.json
//!                                         failed.json
//!                                         errors.json
//! ```
//!
//! The run folder is `completed_period` when either cohort exceeds the
//! configured threshold (a whole period was reconciled rather than a single
//! test batch), otherwise the run timestamp `YYYY-MM-DD HH-MM-SS`.
//! Files whose table would be empty are skipped.

use crate::types::{ReconcileError, ReconciliationReport};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Folder name used when a cohort exceeds the batch threshold
pub const COMPLETED_PERIOD_FOLDER: &str = "completed_period";

/// Configuration for the report writer
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Root directory of all reports
    pub output_root: PathBuf,
    /// Cohort size above which the run counts as a completed period
    pub completed_period_threshold: usize,
    /// Whether to render the tables on stdout
    pub print_tables: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("report_file"),
            completed_period_threshold: 10,
            print_tables: true,
        }
    }
}

/// Files produced by one write
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReport {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Writes reports according to a ReportConfig
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Name of the run folder for this report
    pub fn folder_name(&self, report: &ReconciliationReport, run_at: NaiveDateTime) -> String {
        let threshold = self.config.completed_period_threshold;
        if report.success.count > threshold || report.failed.count > threshold {
            COMPLETED_PERIOD_FOLDER.to_string()
        } else {
            run_at.format("%Y-%m-%d %H-%M-%S").to_string()
        }
    }

    /// Directory the report for this run is written to
    pub fn run_directory(&self, report: &ReconciliationReport, run_at: NaiveDateTime) -> PathBuf {
        self.config
            .output_root
            .join(run_at.format("%Y-%m-%d").to_string())
            .join(self.folder_name(report, run_at))
    }

    /// Create the run directory and write the non-empty tables
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if a directory or file cannot be created or
    /// the JSON cannot be written.
    pub fn write(
        &self,
        report: &ReconciliationReport,
        run_at: NaiveDateTime,
    ) -> Result<WrittenReport, ReconcileError> {
        let directory = self.run_directory(report, run_at);
        fs::create_dir_all(&directory).map_err(|e| {
            ReconcileError::report(format!(
                "Failed to create directory '{}': {}",
                directory.display(),
                e
            ))
        })?;

        let mut files = Vec::new();

        if report.success.is_complete() {
            files.push(write_json_records(
                &directory.join("success.json"),
                std::slice::from_ref(&report.success),
            )?);
        }
        if report.failed.is_complete() {
            files.push(write_json_records(
                &directory.join("failed.json"),
                std::slice::from_ref(&report.failed),
            )?);
        }
        if !report.errors.is_empty() {
            files.push(write_json_records(
                &directory.join("errors.json"),
                &report.errors,
            )?);
        }

        info!(
            directory = %directory.display(),
            files = files.len(),
            "report written"
        );

        Ok(WrittenReport { directory, files })
    }
}

/// Serialize records as a JSON array with four-space indentation
pub fn write_json_records<T: Serialize>(
    path: &Path,
    records: &[T],
) -> Result<PathBuf, ReconcileError> {
    let file = File::create(path).map_err(|e| {
        ReconcileError::report(format!("Failed to create '{}': {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|e| ReconcileError::report(format!("Failed to serialize report: {}", e)))?;
    writer
        .flush()
        .map_err(|e| ReconcileError::report(format!("Failed to flush '{}': {}", path.display(), e)))?;

    debug!(path = %path.display(), records = records.len(), "wrote json records");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorRow, Outcome, OutcomeSummary};
    use chrono::NaiveDate;
    use rstest::rstest;
    use tempfile::TempDir;

    fn run_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 9)
            .unwrap()
            .and_hms_opt(14, 38, 23)
            .unwrap()
    }

    fn summary(outcome: Outcome, count: usize) -> OutcomeSummary {
        if count == 0 {
            return OutcomeSummary::empty(outcome);
        }
        OutcomeSummary {
            outcome,
            count,
            percentage: 50.0,
            mean_created_to_sending: Some(1.0),
            mean_stage_to_outcome: Some(4.0),
            mean_total_time: Some(5.0),
            mean_failed_to_refunded: (outcome == Outcome::Failed).then_some(0.0),
        }
    }

    fn report(successes: usize, failures: usize) -> ReconciliationReport {
        ReconciliationReport {
            success: summary(Outcome::Success, successes),
            failed: summary(Outcome::Failed, failures),
            errors: (0..failures)
                .map(|i| ErrorRow {
                    transfer_id: format!("t{i}"),
                    errors: vec!["Target account is closed".to_string()],
                })
                .collect(),
            durations: Vec::new(),
        }
    }

    #[rstest]
    #[case::small_batch(3, 2, "2023-11-09 14-38-23")]
    #[case::at_threshold(10, 0, "2023-11-09 14-38-23")]
    #[case::success_over_threshold(11, 0, COMPLETED_PERIOD_FOLDER)]
    #[case::failed_over_threshold(0, 11, COMPLETED_PERIOD_FOLDER)]
    fn test_folder_name(
        #[case] successes: usize,
        #[case] failures: usize,
        #[case] expected: &str,
    ) {
        let writer = ReportWriter::default();
        assert_eq!(writer.folder_name(&report(successes, failures), run_at()), expected);
    }

    #[test]
    fn test_write_creates_layout_and_files() {
        let root = TempDir::new().unwrap();
        let writer = ReportWriter::new(ReportConfig {
            output_root: root.path().to_path_buf(),
            ..ReportConfig::default()
        });

        let written = writer.write(&report(1, 1), run_at()).unwrap();

        assert_eq!(
            written.directory,
            root.path().join("2023-11-09").join("2023-11-09 14-38-23")
        );
        assert_eq!(written.files.len(), 3);
        for name in ["success.json", "failed.json", "errors.json"] {
            assert!(written.directory.join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn test_write_skips_empty_tables() {
        let root = TempDir::new().unwrap();
        let writer = ReportWriter::new(ReportConfig {
            output_root: root.path().to_path_buf(),
            ..ReportConfig::default()
        });

        let written = writer.write(&report(2, 0), run_at()).unwrap();

        assert_eq!(written.files, vec![written.directory.join("success.json")]);
    }

    #[test]
    fn test_errors_json_contents() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("errors.json");
        let rows = vec![ErrorRow {
            transfer_id: "4710795078270976".to_string(),
            errors: vec!["Specified amount is zero".to_string()],
        }];

        write_json_records(&path, &rows).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "[\n    {\n        \"transfer_id\": \"4710795078270976\",\n        \"errors\": [\n            \"Specified amount is zero\"\n        ]\n    }\n]"
        );
    }
}
