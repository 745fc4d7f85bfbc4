//! Run summary and JSON report output.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::checker::CheckResult;

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// Checked and labels handed to the sink.
    Updated {
        id: u64,
        url: String,
        result: CheckResult,
        labels: Vec<String>,
    },
    /// No URL in the record body; not an error.
    Skipped { id: u64 },
    /// Processing raised an error; the run will end in failure.
    Failed {
        id: u64,
        url: Option<String>,
        error: String,
    },
}

impl TargetOutcome {
    pub fn id(&self) -> u64 {
        match self {
            TargetOutcome::Updated { id, .. }
            | TargetOutcome::Skipped { id }
            | TargetOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TargetOutcome::Failed { .. })
    }
}

/// Errors writing the report file.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Aggregate result of one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub total: usize,
    pub checked: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<TargetOutcome>,
}

impl AuditReport {
    pub fn from_outcomes(outcomes: Vec<TargetOutcome>) -> Self {
        let mut report = Self {
            total: outcomes.len(),
            checked: 0,
            skipped: 0,
            failed: 0,
            outcomes: Vec::new(),
        };
        for outcome in &outcomes {
            match outcome {
                TargetOutcome::Updated { .. } => report.checked += 1,
                TargetOutcome::Skipped { .. } => report.skipped += 1,
                TargetOutcome::Failed { .. } => report.failed += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    /// True when no record failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Log the run summary, one line per failed record.
    pub fn log_summary(&self) {
        if self.is_success() {
            tracing::info!(
                total = self.total,
                checked = self.checked,
                skipped = self.skipped,
                "Audit completed"
            );
            return;
        }

        tracing::warn!(
            failed = self.failed,
            total = self.total,
            "Completed with {} errors",
            self.failed
        );
        for outcome in self.errors() {
            if let TargetOutcome::Failed { id, url, error } = outcome {
                tracing::warn!(
                    issue = id,
                    url = url.as_deref().unwrap_or("-"),
                    error = %error,
                    "Issue #{} failed",
                    id
                );
            }
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
