//! Run orchestration: mode selection, settings, and the two pipelines.
//!
//! - [`Mode::Generate`]: synthesize personas, then write the JSON and the
//!   Parquet artifact from the same batch in parallel.
//! - [`Mode::Convert`]: walk the input root; JSON files are converted on the
//!   calling thread, zip archives are extracted on the [`ArchivePool`]. The run
//!   returns once every archive task has reported back.

use crate::archive::extract_archive;
use crate::convert::convert_to_report;
use crate::error::{ForgeError, Result};
use crate::generator::PersonaGenerator;
use crate::io::discover::{discover, extraction_dir};
use crate::io::json::{ParsePolicy, write_personas_json};
use crate::io::parquet::{ColumnarOptions, write_columnar};
use crate::model::Personas;
use crate::report::RunReport;
use crate::runner::ArchivePool;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Generate,
    Convert,
}

impl FromStr for Mode {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "genData" => Ok(Self::Generate),
            "convertData" => Ok(Self::Convert),
            other => Err(ForgeError::InvalidMode(other.to_string())),
        }
    }
}

/// Where inputs are read and artifacts are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub generated_root: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("input"),
            output_root: PathBuf::from("output"),
            generated_root: PathBuf::from("generatedData"),
        }
    }
}

impl Layout {
    /// The default layout placed under `base` instead of the working directory.
    #[must_use]
    pub fn rooted_at(base: &Path) -> Self {
        let d = Self::default();
        Self {
            input_root: base.join(d.input_root),
            output_root: base.join(d.output_root),
            generated_root: base.join(d.generated_root),
        }
    }

    /// `generatedData/JSON/generated-<count>.json`
    #[must_use]
    pub fn json_artifact(&self, count: usize) -> PathBuf {
        self.generated_root
            .join("JSON")
            .join(format!("generated-{count}.json"))
    }

    /// `generatedData/PARQUET/generated-<count>.parquet`
    #[must_use]
    pub fn parquet_artifact(&self, count: usize) -> PathBuf {
        self.generated_root
            .join("PARQUET")
            .join(format!("generated-{count}.parquet"))
    }

    /// Output path for a loose JSON file: `output/<file name>.parquet`.
    ///
    /// The directory the file came from is not kept, so equal file names in
    /// different input directories overwrite each other.
    #[must_use]
    pub fn converted_path(&self, source: &Path) -> PathBuf {
        let name = source.file_name().unwrap_or_else(|| OsStr::new("unnamed"));
        self.output_root.join(with_parquet_suffix(Path::new(name)))
    }

    /// `input/<archive stem>`
    #[must_use]
    pub fn extraction_dir(&self, archive: &Path) -> PathBuf {
        extraction_dir(&self.input_root, archive)
    }

    /// Output path for an archive entry: `output/<archive stem>/<entry>.parquet`,
    /// where `entry` is the sandboxed path inside the archive.
    #[must_use]
    pub fn entry_output_path(&self, archive: &Path, entry: &Path) -> PathBuf {
        let stem = archive.file_stem().unwrap_or_default();
        self.output_root.join(stem).join(with_parquet_suffix(entry))
    }
}

fn with_parquet_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".parquet");
    PathBuf::from(name)
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub layout: Layout,
    /// Writer settings for generated artifacts.
    pub generated: ColumnarOptions,
    /// Writer settings for converted inputs.
    pub converted: ColumnarOptions,
    pub parse_policy: ParsePolicy,
    /// Archive tasks allowed to run at once.
    pub archive_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            generated: ColumnarOptions::generated(),
            converted: ColumnarOptions::converted(),
            parse_policy: ParsePolicy::default(),
            archive_workers: num_cpus::get().max(2),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// Run one mode to completion.
///
/// `quantity` is only used by [`Mode::Generate`].
///
/// # Errors
/// Only setup failures that prevent the run from starting (missing input
/// root, worker pool). Everything else is collected in the report.
pub fn run(mode: Mode, quantity: usize, settings: &Settings) -> Result<RunReport> {
    let mut report = match mode {
        Mode::Generate => generate(quantity, settings),
        Mode::Convert => convert(settings)?,
    };
    report.normalize();
    Ok(report)
}

/// Generate `quantity` personas and write both artifacts.
#[must_use]
pub fn generate(quantity: usize, settings: &Settings) -> RunReport {
    info!(quantity, "generating personas");
    let personas = PersonaGenerator::new().generate(quantity);
    write_generated(&personas, settings)
}

/// Write the JSON and Parquet artifacts of one generated batch concurrently.
#[must_use]
pub fn write_generated(personas: &Personas, settings: &Settings) -> RunReport {
    let layout = &settings.layout;
    let json_path = layout.json_artifact(personas.len());
    let parquet_path = layout.parquet_artifact(personas.len());

    let (json, columnar) = rayon::join(
        || write_personas_json(&json_path, personas),
        || write_columnar(&parquet_path, &personas.persona, &settings.generated),
    );

    let mut report = RunReport::default();
    match json {
        Ok(n) => report.record_output(&json_path, n),
        Err(e) => report.record_error(&json_path, &e),
    }
    match columnar {
        Ok(summary) => report.record_write(&summary),
        Err(e) => report.record_error(&parquet_path, &e),
    }
    report
}

/// Walk the input root and convert everything found.
///
/// # Errors
/// [`ForgeError::MissingInput`] when the input root does not exist, and
/// worker pool construction failures.
#[tracing::instrument(skip_all, fields(input = %settings.layout.input_root.display()))]
pub fn convert(settings: &Settings) -> Result<RunReport> {
    let inputs = discover(&settings.layout.input_root)?;
    let pool = ArchivePool::new(settings.archive_workers)?;
    info!(workers = pool.workers(), "converting inputs");

    let report = pool.run(
        inputs,
        |json| {
            convert_to_report(
                json,
                &settings.layout.converted_path(json),
                settings.parse_policy,
                &settings.converted,
            )
        },
        |archive| extract_archive(archive, settings),
    );
    Ok(report)
}
