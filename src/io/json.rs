//! JSON document I/O.
//!
//! - [`write_personas_json`] writes generated output as `{"Persona": [...]}`.
//! - [`parse_records`] / [`read_records`] decode a JSON document into typed
//!   records, one outcome per element, so a single bad record can be reported
//!   with its index instead of poisoning the whole file.
//!
//! Accepted input shapes: a top-level array, or an object holding exactly one
//! array-valued key (the shape [`write_personas_json`] produces).

use crate::error::{ForgeError, Result};
use crate::model::Personas;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

/// What to do with a file where some records failed to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Any rejected record abandons the whole file before output is written.
    #[default]
    Abort,
    /// Convert the good records; report each rejected one.
    SkipInvalid,
}

/// A record that failed to decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordError {
    /// Position of the element in the input array.
    pub index: usize,
    pub message: String,
}

/// Per-record decoding outcome of one JSON document.
#[derive(Clone, Debug)]
pub struct ParsedBatch<T> {
    /// Successfully decoded records, in input order.
    pub records: Vec<T>,
    pub rejected: Vec<RecordError>,
}

impl<T> ParsedBatch<T> {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Apply `policy`, turning rejections into a file-level error under
    /// [`ParsePolicy::Abort`].
    ///
    /// # Errors
    /// [`ForgeError::InvalidRecords`] when the policy is `Abort` and at least
    /// one record was rejected.
    pub fn enforce(self, policy: ParsePolicy, path: &Path) -> Result<Self> {
        if policy == ParsePolicy::Abort
            && let Some(first) = self.rejected.first()
        {
            return Err(ForgeError::InvalidRecords {
                path: path.to_path_buf(),
                count: self.rejected.len(),
                first_index: first.index,
                first_message: first.message.clone(),
            });
        }
        Ok(self)
    }
}

/// Write generated personas as one JSON document.
///
/// Parent directories are created as needed; an existing file is replaced.
///
/// # Returns
/// The number of personas written.
///
/// # Errors
/// Returns an error if the directories or file cannot be created, or writing
/// fails.
pub fn write_personas_json(path: impl AsRef<Path>, personas: &Personas) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(|e| ForgeError::io("mkdir -p", parent, e))?;
    }
    let f = File::create(path).map_err(|e| ForgeError::io("create", path, e))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, personas)
        .map_err(|e| ForgeError::io("write", path, e.into()))?;
    w.flush().map_err(|e| ForgeError::io("flush", path, e))?;
    Ok(personas.len())
}

/// Decode `bytes` into typed records.
///
/// `path` only labels errors.
///
/// # Errors
/// [`ForgeError::Json`] for malformed JSON (with line/column),
/// [`ForgeError::Shape`] when the document is not an array or a single-array
/// wrapper object. Individual bad records do not error; they land in
/// [`ParsedBatch::rejected`].
pub fn parse_records<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<ParsedBatch<T>> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|source| ForgeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter(|(_, v)| v.is_array());
            match (arrays.next(), arrays.next()) {
                (Some((_, Value::Array(items))), None) => items,
                _ => {
                    return Err(ForgeError::Shape {
                        path: path.to_path_buf(),
                        detail: "object must hold exactly one array".into(),
                    });
                }
            }
        }
        other => {
            return Err(ForgeError::Shape {
                path: path.to_path_buf(),
                detail: format!("expected an array, found {}", kind(&other)),
            });
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(r) => records.push(r),
            Err(e) => rejected.push(RecordError {
                index,
                message: e.to_string(),
            }),
        }
    }
    Ok(ParsedBatch { records, rejected })
}

/// Read a JSON file and decode it with [`parse_records`].
///
/// # Errors
/// I/O failures plus everything [`parse_records`] reports.
pub fn read_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<ParsedBatch<T>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ForgeError::io("read", path, e))?;
    parse_records(&bytes, path)
}

const fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
