//! File formats the tool reads and writes.
//!
//! - [`json`] - persona JSON documents in, generated JSON out
//! - [`parquet`] - columnar output with byte-bounded row groups
//! - [`discover`] - finding JSON files and zip archives under the input root

pub mod discover;
pub mod json;
pub mod parquet;
