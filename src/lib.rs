//! # persona-forge
//!
//! Synthetic **persona** records and a small **JSON → Parquet** batch
//! converter.
//!
//! ## Key Features
//!
//! - **Generation** - synthesize N rich personas (nested personal data and
//!   documents) and write them as `generated-<N>.json` and `generated-<N>.parquet`
//! - **Conversion** - walk an input tree, unzip archives, convert every JSON
//!   array of personas (flat or rich) into a Snappy-compressed Parquet file
//! - **Bounded concurrency** - archives are extracted on a fixed-size worker
//!   pool; the run returns once every archive has reported back
//! - **Attributable failures** - every failure is collected with its path and
//!   severity into a [`RunReport`] that drives the exit status
//!
//! ## Quick Start
//!
//! ```no_run
//! use persona_forge::*;
//! # fn main() -> persona_forge::Result<()> {
//! let settings = Settings::default();
//!
//! // generatedData/JSON/generated-100.json + generatedData/PARQUET/generated-100.parquet
//! let report = run(Mode::Generate, 100, &settings)?;
//! assert!(report.is_success());
//!
//! // input/**/x.json -> output/x.json.parquet
//! // input/**/a.zip  -> input/a/** -> output/a/**.json.parquet
//! let report = run(Mode::Convert, 0, &settings)?;
//! report.log_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Record shapes
//!
//! Two distinct record types exist and are never converted into each other:
//! [`Persona`] (rich, produced by the generator) and [`FlatPersona`]
//! (`name`/`email`/`id`). The converter reads either one, whichever the file
//! holds, and writes it with its own schema. Both implement
//! [`ColumnarRecord`], which provides the Arrow schema used for Parquet.
//!
//! ## Module Overview
//!
//! - [`model`] - record types and their columnar schema
//! - [`generator`] - fake persona synthesis
//! - [`io`] - JSON codec, Parquet writer/reader, input discovery
//! - [`archive`] - zip extraction with entry-name sandboxing
//! - [`convert`] - one JSON file to one Parquet file
//! - [`runner`] - bounded archive worker pool
//! - [`pipeline`] - modes, layout, settings and the two pipelines
//! - [`report`] - run outcome collection
//! - [`testing`] - fixtures and temporary workspaces for tests

pub mod archive;
pub mod cli;
pub mod convert;
pub mod error;
pub mod generator;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod testing;

pub use error::{ForgeError, Result, Severity};
pub use generator::PersonaGenerator;
pub use io::json::{ParsePolicy, parse_records, read_records, write_personas_json};
pub use io::parquet::{Codec, ColumnarOptions, read_columnar, write_columnar};
pub use model::{ColumnarRecord, FlatPersona, Persona, Personal, PersonalDocuments, Personas, Variant};
pub use pipeline::{Layout, Mode, Settings, run};
pub use report::{Failure, RunReport};
