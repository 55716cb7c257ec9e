//! Parquet output for persona records.
//!
//! This module provides:
//! - [`write_columnar`] to write a slice of [`ColumnarRecord`]s as one Parquet
//!   file with a byte-bounded row-group size and a chosen compression codec;
//! - [`read_columnar`] to read a whole file back into typed records.
//!
//! Schemas are traced from the record type with `serde_arrow`
//! (`SchemaLike::from_type`) and rows are converted with `to_record_batch`.
//! Conversion happens `batch_rows` rows at a time; a batch that fails is
//! retried row by row so only the offending rows are dropped.

use crate::error::{ForgeError, Result};
use crate::model::{ColumnarRecord, nesting_depth};
use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_arrow::{from_record_batch, to_record_batch};
use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Uncompressed size at which the in-progress row group is closed.
pub const DEFAULT_ROW_GROUP_BYTES: usize = 128 * 1024 * 1024;

/// Rows converted to Arrow per step.
pub const DEFAULT_BATCH_ROWS: usize = 1024;

/// Block compression applied to every column chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Uncompressed,
    Snappy,
}

impl From<Codec> for Compression {
    fn from(c: Codec) -> Self {
        match c {
            Codec::Uncompressed => Self::UNCOMPRESSED,
            Codec::Snappy => Self::SNAPPY,
        }
    }
}

/// Writer knobs.
///
/// Generated and converted output use different defaults
/// ([`ColumnarOptions::generated`], [`ColumnarOptions::converted`]); both
/// stay independently settable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnarOptions {
    pub row_group_bytes: usize,
    pub compression: Codec,
    pub batch_rows: usize,
}

impl ColumnarOptions {
    /// Settings for generated artifacts: no compression.
    #[must_use]
    pub const fn generated() -> Self {
        Self {
            row_group_bytes: DEFAULT_ROW_GROUP_BYTES,
            compression: Codec::Uncompressed,
            batch_rows: DEFAULT_BATCH_ROWS,
        }
    }

    /// Settings for converted inputs: Snappy.
    #[must_use]
    pub const fn converted() -> Self {
        Self {
            compression: Codec::Snappy,
            ..Self::generated()
        }
    }

    #[must_use]
    pub const fn with_compression(mut self, compression: Codec) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub const fn with_row_group_bytes(mut self, bytes: usize) -> Self {
        self.row_group_bytes = bytes;
        self
    }

    #[must_use]
    pub const fn with_batch_rows(mut self, rows: usize) -> Self {
        self.batch_rows = rows;
        self
    }
}

/// A row that could not be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFailure {
    /// Index of the row in the input slice.
    pub row: usize,
    pub message: String,
}

/// Result of one [`write_columnar`] call.
#[derive(Clone, Debug)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub rows_written: usize,
    pub failed_rows: Vec<RowFailure>,
}

impl WriteSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_rows.is_empty()
    }
}

/// Write `records` to a Parquet file at `path`, one row per record, in order.
///
/// Parent directories are created as needed and an existing file is replaced.
/// An empty slice still produces a valid file (schema and footer, no row
/// groups).
///
/// # Errors
/// - [`ForgeError::Schema`] if the traced schema depth disagrees with
///   `R::NESTING_DEPTH` (nothing is created on disk);
/// - I/O or writer setup failures;
/// - finalization failures, in which case the file may be left truncated.
///
/// Per-row failures are not errors; they are listed in
/// [`WriteSummary::failed_rows`].
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), rows = records.len()))]
pub fn write_columnar<R: ColumnarRecord>(
    path: impl AsRef<Path>,
    records: &[R],
    opts: &ColumnarOptions,
) -> Result<WriteSummary> {
    let path = path.as_ref();

    let fields = R::fields()?;
    let depth = nesting_depth(&fields);
    if depth != R::NESTING_DEPTH {
        return Err(ForgeError::Schema {
            variant: R::VARIANT.as_str(),
            detail: format!(
                "declared nesting depth {} but the traced schema is {depth} deep",
                R::NESTING_DEPTH
            ),
        });
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(|e| ForgeError::io("mkdir -p", parent, e))?;
    }
    let file = File::create(path).map_err(|e| ForgeError::io("create", path, e))?;
    let schema = Arc::new(Schema::new(fields.clone()));
    let props = WriterProperties::builder()
        .set_compression(opts.compression.into())
        .build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .map_err(|e| ForgeError::parquet("open writer", path, e))?;

    let mut summary = WriteSummary {
        path: path.to_path_buf(),
        rows_written: 0,
        failed_rows: Vec::new(),
    };

    let batch_rows = opts.batch_rows.max(1);
    for (n, chunk) in records.chunks(batch_rows).enumerate() {
        let offset = n * batch_rows;
        let batches = match to_record_batch(&fields, &chunk) {
            Ok(batch) => vec![(offset, batch)],
            Err(e) => {
                debug!(offset, error = %e, "batch conversion failed, retrying row by row");
                split_rows(&fields, chunk, offset, &mut summary.failed_rows)
            }
        };

        for (first, batch) in batches {
            let rows = batch.num_rows();
            if let Err(e) = writer.write(&batch) {
                warn!(path = %path.display(), first, rows, error = %e, "write error");
                summary.failed_rows.extend((first..first + rows).map(|row| RowFailure {
                    row,
                    message: e.to_string(),
                }));
                continue;
            }
            summary.rows_written += rows;

            if writer.in_progress_size() >= opts.row_group_bytes
                && let Err(e) = writer.flush()
            {
                warn!(path = %path.display(), error = %e, "row group flush error");
            }
        }
    }

    writer
        .close()
        .map_err(|e| ForgeError::parquet("finalize", path, e))?;

    info!(
        path = %path.display(),
        rows = summary.rows_written,
        failed = summary.failed_rows.len(),
        "write finished"
    );
    Ok(summary)
}

/// Convert `chunk` one row at a time, keeping the rows that convert.
fn split_rows<R: ColumnarRecord>(
    fields: &[FieldRef],
    chunk: &[R],
    offset: usize,
    failed: &mut Vec<RowFailure>,
) -> Vec<(usize, RecordBatch)> {
    let mut out = Vec::with_capacity(chunk.len());
    for (i, record) in chunk.iter().enumerate() {
        let row = offset + i;
        match to_record_batch(fields, &std::slice::from_ref(record)) {
            Ok(batch) => out.push((row, batch)),
            Err(e) => {
                warn!(row, error = %e, "write error");
                failed.push(RowFailure {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }
    out
}

/// Read a Parquet file into typed records.
///
/// # Errors
/// Returns an error if the file cannot be opened, the reader cannot be built,
/// batch iteration fails, or rows do not decode as `R`.
pub fn read_columnar<R: ColumnarRecord>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ForgeError::io("open", path, e))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .and_then(|b| b.with_batch_size(64 * 1024).build())
        .map_err(|e| ForgeError::parquet("open reader", path, e))?;

    let mut out = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|source| ForgeError::ArrowRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut rows: Vec<R> = from_record_batch(&batch).map_err(|source| ForgeError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        out.append(&mut rows);
    }
    Ok(out)
}
