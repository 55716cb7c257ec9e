//! Run outcome collection.
//!
//! Every stage funnels its results into a [`RunReport`]: the outputs it
//! produced and a [`Failure`] per thing that went wrong, classified by
//! [`Severity`]. Archive tasks build their own report and the orchestrator
//! merges them, so the final report covers the whole run.

use crate::convert::Converted;
use crate::error::{ForgeError, Severity};
use crate::io::parquet::WriteSummary;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// One failed operation, attributed to the file it concerns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

impl Failure {
    #[must_use]
    pub fn from_error(path: &Path, err: &ForgeError) -> Self {
        Self {
            path: path.to_path_buf(),
            severity: err.severity(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Fatal => "fatal",
            Severity::Recoverable => "error",
        };
        write!(f, "[{tag}] {}: {}", self.path.display(), self.message)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Files written successfully (possibly with dropped rows).
    pub outputs: Vec<PathBuf>,
    pub rows_written: usize,
    pub failures: Vec<Failure>,
}

impl RunReport {
    /// Record a failed operation and log it.
    pub fn record_error(&mut self, path: &Path, err: &ForgeError) {
        let failure = Failure::from_error(path, err);
        match failure.severity {
            Severity::Fatal => error!(path = %path.display(), "{err}"),
            Severity::Recoverable => warn!(path = %path.display(), "{err}"),
        }
        self.failures.push(failure);
    }

    /// Record the result of one JSON file conversion.
    pub fn record_converted(&mut self, converted: &Converted) {
        for rejected in &converted.rejected {
            self.failures.push(Failure {
                path: converted.source.clone(),
                severity: Severity::Recoverable,
                message: format!("record {} skipped: {}", rejected.index, rejected.message),
            });
        }
        self.record_write(&converted.summary);
    }

    /// Record a finished Parquet write, including the rows it dropped.
    pub fn record_write(&mut self, summary: &WriteSummary) {
        for row in &summary.failed_rows {
            self.failures.push(Failure {
                path: summary.path.clone(),
                severity: Severity::Recoverable,
                message: format!("row {} not written: {}", row.row, row.message),
            });
        }
        self.record_output(&summary.path, summary.rows_written);
    }

    pub fn record_output(&mut self, path: &Path, rows: usize) {
        self.outputs.push(path.to_path_buf());
        self.rows_written += rows;
    }

    pub fn merge(&mut self, other: Self) {
        self.outputs.extend(other.outputs);
        self.rows_written += other.rows_written;
        self.failures.extend(other.failures);
    }

    /// Sort outputs and failures by path; archive tasks finish in any order.
    pub fn normalize(&mut self) {
        self.outputs.sort();
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn fatal_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.severity == Severity::Fatal)
            .count()
    }

    /// Process exit status: 0 when nothing failed, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }

    /// Log a one-line summary plus every failure.
    pub fn log_summary(&self) {
        info!(
            outputs = self.outputs.len(),
            rows = self.rows_written,
            failures = self.failures.len(),
            fatal = self.fatal_count(),
            "run finished"
        );
        for failure in &self.failures {
            warn!("{failure}");
        }
    }
}
