//! Zip archive extraction.
//!
//! An archive `<input>/**/name.zip` is unpacked into `<input>/name/`, entry by
//! entry. JSON entries are converted to `<output>/name/<entry>.parquet`.
//! Each `.json` entry is converted right after it is written, before the next
//! entry is read. Entry names that would land outside the extraction
//! directory (absolute paths, `..` components) are refused and reported; the
//! rest of the archive is still processed.

use crate::convert::convert_to_report;
use crate::error::{ForgeError, Result};
use crate::io::discover::{InputKind, input_kind};
use crate::pipeline::Settings;
use crate::report::RunReport;
use std::fs::{File, create_dir_all};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Extract `archive` and convert the JSON files it contains.
///
/// Never panics or exits the process; every failure ends up in the returned
/// report. Failing to open the archive or to create the extraction directory
/// ends the task; a failing entry only skips that entry.
#[tracing::instrument(skip_all, fields(archive = %archive.display()))]
pub fn extract_archive(archive: &Path, settings: &Settings) -> RunReport {
    let mut report = RunReport::default();
    if let Err(e) = extract_into(archive, settings, &mut report) {
        report.record_error(archive, &e);
    }
    report
}

fn extract_into(archive: &Path, settings: &Settings, report: &mut RunReport) -> Result<()> {
    let file = File::open(archive).map_err(|e| ForgeError::io("open", archive, e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|source| ForgeError::Archive {
        path: archive.to_path_buf(),
        source,
    })?;

    let dest = settings.layout.extraction_dir(archive);
    create_dir_all(&dest).map_err(|source| ForgeError::Destination {
        path: dest.clone(),
        source,
    })?;
    info!(entries = zip.len(), dest = %dest.display(), "unzipping");

    for index in 0..zip.len() {
        match extract_entry(&mut zip, index, archive, &dest) {
            Ok(Some((json, entry))) => {
                let output = settings.layout.entry_output_path(archive, &entry);
                report.merge(convert_to_report(
                    &json,
                    &output,
                    settings.parse_policy,
                    &settings.converted,
                ));
            }
            Ok(None) => {}
            Err(e) => report.record_error(archive, &e),
        }
    }
    Ok(())
}

/// Write entry `index` under `dest`.
///
/// For a JSON entry, returns where it was written and its path inside the
/// archive.
fn extract_entry<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    index: usize,
    archive: &Path,
    dest: &Path,
) -> Result<Option<(PathBuf, PathBuf)>> {
    let mut entry = zip.by_index(index).map_err(|source| ForgeError::Archive {
        path: archive.to_path_buf(),
        source,
    })?;
    let Some(relative) = entry.enclosed_name() else {
        return Err(ForgeError::UnsafeEntry {
            archive: archive.to_path_buf(),
            entry: entry.name().to_string(),
        });
    };
    let target = dest.join(&relative);

    if entry.is_dir() {
        create_dir_all(&target).map_err(|e| ForgeError::io("mkdir -p", &target, e))?;
        return Ok(None);
    }
    if let Some(parent) = target.parent() {
        create_dir_all(parent).map_err(|e| ForgeError::io("mkdir -p", parent, e))?;
    }
    let mut out = File::create(&target).map_err(|e| ForgeError::io("create", &target, e))?;
    let bytes = std::io::copy(&mut entry, &mut out).map_err(|e| ForgeError::io("copy", &target, e))?;
    debug!(entry = entry.name(), bytes, "extracted");

    Ok((input_kind(&target) == Some(InputKind::Json)).then_some((target, relative)))
}
