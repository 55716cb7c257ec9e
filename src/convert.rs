//! JSON file → Parquet file conversion.
//!
//! Inputs hold either flat personas (`name`/`email`/`id`) or rich personas as
//! the generator writes them. The file is decoded as flat first; when that
//! leaves rejects and the rich shape decodes more records, the file is treated
//! as rich. Each variant is written with its own schema.

use crate::error::{ForgeError, Result};
use crate::io::json::{ParsePolicy, ParsedBatch, RecordError, parse_records};
use crate::io::parquet::{ColumnarOptions, WriteSummary, write_columnar};
use crate::model::{ColumnarRecord, FlatPersona, Persona, Variant};
use crate::report::RunReport;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of converting one JSON file.
#[derive(Clone, Debug)]
pub struct Converted {
    pub source: PathBuf,
    pub output: PathBuf,
    pub variant: Variant,
    pub summary: WriteSummary,
    /// Records skipped under [`ParsePolicy::SkipInvalid`].
    pub rejected: Vec<RecordError>,
}

/// Read `source` as an array of personas and write them to `output`.
///
/// Under [`ParsePolicy::Abort`] a single bad record fails the file and no
/// output is created.
///
/// # Errors
/// Read/parse failures, rejected records under `Abort`, and writer failures.
#[tracing::instrument(skip_all, fields(source = %source.display()))]
pub fn convert_json_file(
    source: &Path,
    output: &Path,
    policy: ParsePolicy,
    opts: &ColumnarOptions,
) -> Result<Converted> {
    info!(output = %output.display(), "converting");
    let bytes = std::fs::read(source).map_err(|e| ForgeError::io("read", source, e))?;

    let flat = parse_records::<FlatPersona>(&bytes, source)?;
    if !flat.is_clean() {
        let rich = parse_records::<Persona>(&bytes, source)?;
        if rich.records.len() > flat.records.len() {
            debug!(records = rich.records.len(), "input holds rich personas");
            return write_batch(rich, source, output, policy, opts);
        }
    }
    write_batch(flat, source, output, policy, opts)
}

fn write_batch<R: ColumnarRecord>(
    batch: ParsedBatch<R>,
    source: &Path,
    output: &Path,
    policy: ParsePolicy,
    opts: &ColumnarOptions,
) -> Result<Converted> {
    let batch = batch.enforce(policy, source)?;
    for rejected in &batch.rejected {
        warn!(index = rejected.index, "skipping record: {}", rejected.message);
    }

    let summary = write_columnar(output, &batch.records, opts)?;
    Ok(Converted {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        variant: R::VARIANT,
        summary,
        rejected: batch.rejected,
    })
}

/// [`convert_json_file`] folded into a [`RunReport`].
#[must_use]
pub fn convert_to_report(
    source: &Path,
    output: &Path,
    policy: ParsePolicy,
    opts: &ColumnarOptions,
) -> RunReport {
    let mut report = RunReport::default();
    match convert_json_file(source, output, policy, opts) {
        Ok(converted) => report.record_converted(&converted),
        Err(e) => report.record_error(source, &e),
    }
    report
}
