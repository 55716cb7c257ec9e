//! Persona record shapes.
//!
//! Two distinct record types live here and are never coerced into each other:
//!
//! - [`Persona`] is the **rich** variant with nested [`Personal`] and
//!   [`PersonalDocuments`] groups. Produced by the generator and written both
//!   as JSON (wrapped in [`Personas`]) and as Parquet. The converter reads it
//!   back from such files.
//! - [`FlatPersona`] is the **flat** variant (`name`, `email`, `id`). Read from
//!   JSON inputs by the conversion pipeline and written as Parquet.
//!
//! Serde field names double as Parquet column names: `serde_arrow` traces the
//! Arrow schema from the type (the flat schema is spelled out by hand), so `String` becomes `Utf8` (Parquet
//! `BYTE_ARRAY` + `STRING`), `bool` becomes `BOOLEAN` and nested structs
//! become Parquet groups.

use crate::error::{ForgeError, Result};
use arrow::datatypes::{DataType, Field, FieldRef};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use std::fmt;
use std::sync::Arc;

/// Document categories a generated persona can carry.
pub const DOCUMENT_TYPES: [&str; 2] = ["CPF", "RG"];

/// Which record shape a file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Rich,
    Flat,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Variant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rich => "rich",
            Self::Flat => "flat",
        }
    }
}

/// A record type that can be written as a Parquet row.
///
/// `NESTING_DEPTH` is the deepest leaf column path length the type declares
/// (`1` for a flat record). The writer refuses to start when the schema traced
/// from the type disagrees with it.
pub trait ColumnarRecord: Serialize + DeserializeOwned + Send + Sync {
    const VARIANT: Variant;
    const NESTING_DEPTH: usize;

    /// Arrow fields for this record type.
    ///
    /// # Errors
    /// Returns [`ForgeError::Schema`] when `serde_arrow` cannot trace the type.
    fn fields() -> Result<Vec<FieldRef>> {
        Vec::<FieldRef>::from_type::<Self>(TracingOptions::default()).map_err(|e| {
            ForgeError::Schema {
                variant: Self::VARIANT.as_str(),
                detail: e.to_string(),
            }
        })
    }
}

/// Deepest leaf path length across `fields`.
#[must_use]
pub fn nesting_depth(fields: &[FieldRef]) -> usize {
    fields.iter().map(|f| field_depth(f.data_type())).max().unwrap_or(0)
}

fn field_depth(dt: &DataType) -> usize {
    match dt {
        DataType::Struct(children) => {
            1 + children
                .iter()
                .map(|c| field_depth(c.data_type()))
                .max()
                .unwrap_or(0)
        }
        _ => 1,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDocuments {
    pub document_type: String,
    pub document_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personal {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub hometown: String,
    pub birth_state: String,
    pub profession: String,
    /// Decimal string, e.g. `"4821,00"`.
    pub income: String,
    pub personal_documents: PersonalDocuments,
}

/// Rich persona, as produced by the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub person_id: String,
    pub personal: Personal,
    pub status: bool,
}

impl ColumnarRecord for Persona {
    const VARIANT: Variant = Variant::Rich;
    const NESTING_DEPTH: usize = 3;
}

/// JSON root of generated output: `{"Persona": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personas {
    #[serde(rename = "Persona")]
    pub persona: Vec<Persona>,
}

impl Personas {
    #[must_use]
    pub fn len(&self) -> usize {
        self.persona.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persona.is_empty()
    }
}

/// Flat persona, as read by the conversion pipeline.
///
/// Exactly three fields; anything else in the JSON object is rejected.
/// Capitalised keys (`Name`, `Email`, `ID`) are accepted too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatPersona {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "ID", alias = "Id")]
    pub id: String,
}

/// Column names of [`FlatPersona`], in row order.
pub const FLAT_COLUMNS: [&str; 3] = ["name", "email", "id"];

impl ColumnarRecord for FlatPersona {
    const VARIANT: Variant = Variant::Flat;
    const NESTING_DEPTH: usize = 1;

    /// Built by hand: serde lists the read aliases as extra field names, and
    /// tracing them would map `Name` onto `name` twice.
    fn fields() -> Result<Vec<FieldRef>> {
        Ok(FLAT_COLUMNS
            .into_iter()
            .map(|name| Arc::new(Field::new(name, DataType::Utf8, false)))
            .collect())
    }
}
