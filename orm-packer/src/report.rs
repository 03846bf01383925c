/// Batch summary and optional JSON report of every processed directory.
use crate::config::RunConfiguration;
use crate::error::PackerError;
use crate::processor::{DirectoryReport, IndividualOutcome, OrmFileOutcome, OrmFlowOutcome};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Totals across all directories of one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub directories: usize,
    pub individual_succeeded: usize,
    pub individual_skipped: usize,
    pub individual_failed: usize,
    pub orm_skipped: usize,
    pub orm_files_succeeded: usize,
    pub orm_files_failed: usize,
    pub files_written: usize,
    pub files_deleted: usize,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn from_reports(reports: &[DirectoryReport], elapsed: Duration) -> Self {
        let mut summary = Self {
            directories: reports.len(),
            elapsed_ms: elapsed.as_millis() as u64,
            ..Self::default()
        };

        for report in reports {
            summary.files_written += report.written().len();

            match &report.individual {
                Some(IndividualOutcome::Succeeded { deleted, .. }) => {
                    summary.individual_succeeded += 1;
                    summary.files_deleted += deleted.len();
                }
                Some(IndividualOutcome::Skipped { .. }) => summary.individual_skipped += 1,
                Some(IndividualOutcome::Failed { .. }) => summary.individual_failed += 1,
                None => {}
            }

            match &report.orm {
                Some(OrmFlowOutcome::Skipped) => summary.orm_skipped += 1,
                Some(OrmFlowOutcome::Processed { files }) => {
                    for file in files {
                        match file {
                            OrmFileOutcome::Succeeded { .. } => summary.orm_files_succeeded += 1,
                            OrmFileOutcome::Failed { .. } => summary.orm_files_failed += 1,
                        }
                    }
                }
                None => {}
            }
        }

        summary
    }

    pub fn failures(&self) -> usize {
        self.individual_failed + self.orm_files_failed
    }

    /// Logs the totals as a single event.
    pub fn log(&self) {
        let text = format!(
            "Batch summary:\n  Directories: {}\n  Individual sets: {} packed, {} skipped, {} failed\n  ORM textures: {} processed, {} failed ({} directories without ORM)\n  Files written: {}, deleted: {}\nTook {} ms",
            self.directories,
            self.individual_succeeded,
            self.individual_skipped,
            self.individual_failed,
            self.orm_files_succeeded,
            self.orm_files_failed,
            self.orm_skipped,
            self.files_written,
            self.files_deleted,
            self.elapsed_ms
        );

        if self.failures() > 0 {
            warn!("{}", text);
        } else {
            info!("{}", text);
        }
    }
}

/// Saves configuration, totals and per-directory outcomes as JSON.
pub fn write_report(
    path: &Path,
    config: &RunConfiguration,
    summary: &BatchSummary,
    reports: &[DirectoryReport],
) -> Result<(), PackerError> {
    let report = json!({
        "configuration": config,
        "summary": summary,
        "directories": reports,
    });

    fs::write(path, serde_json::to_string_pretty(&report)?)?;
    info!("Saved report: {}", path.display());

    Ok(())
}
