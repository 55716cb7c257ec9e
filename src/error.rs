//! Error type shared by every stage of the tool.
//!
//! Each variant carries the path it relates to so a failure can be attributed
//! to one input without re-reading logs. [`ForgeError::severity`] tells the
//! orchestrator whether the failure abandoned a whole file/archive task or a
//! single row/entry inside it.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ForgeError>;

/// How much work a failure took down with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// One row, one archive entry, or one output finalization was lost.
    Recoverable,
    /// The whole file (or archive task) was abandoned.
    Fatal,
}

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Invalid type: {0}")]
    InvalidMode(String),

    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected JSON document shape in {path}: {detail}")]
    Shape { path: PathBuf, detail: String },

    #[error("{path}: {count} invalid record(s), first at index {first_index}: {first_message}")]
    InvalidRecords {
        path: PathBuf,
        count: usize,
        first_index: usize,
        first_message: String,
    },

    #[error("schema for {variant} records: {detail}")]
    Schema { variant: &'static str, detail: String },

    #[error("arrow conversion for {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: serde_arrow::Error,
    },

    #[error("reading record batches from {path}: {source}")]
    ArrowRead {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("parquet {op} {path}: {source}")]
    Parquet {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive {archive}: entry {entry:?} escapes the extraction directory")]
    UnsafeEntry { archive: PathBuf, entry: String },

    #[error("cannot create extraction directory {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input root {0} does not exist")]
    MissingInput(PathBuf),

    #[error("walking {pattern}: {detail}")]
    Walk { pattern: String, detail: String },

    #[error("archive worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ForgeError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parquet(
        op: &'static str,
        path: impl Into<PathBuf>,
        source: parquet::errors::ParquetError,
    ) -> Self {
        Self::Parquet {
            op,
            path: path.into(),
            source,
        }
    }

    /// Classify the failure for reporting.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Json { .. }
            | Self::Shape { .. }
            | Self::InvalidRecords { .. }
            | Self::Schema { .. }
            | Self::Destination { .. }
            | Self::MissingInput(_)
            | Self::InvalidMode(_)
            | Self::WorkerPool(_) => Severity::Fatal,
            Self::Io { .. }
            | Self::Arrow { .. }
            | Self::ArrowRead { .. }
            | Self::Parquet { .. }
            | Self::Archive { .. }
            | Self::UnsafeEntry { .. }
            | Self::Walk { .. } => Severity::Recoverable,
        }
    }
}
