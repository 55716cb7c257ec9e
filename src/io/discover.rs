//! Input discovery for the conversion pipeline.
//!
//! [`discover`] walks an input root recursively with a `**/*` glob and yields
//! the files the pipeline acts on, lazily, so callers can dispatch work while
//! the walk is still running.
//!
//! A path is yielded when it is a regular file, its base name does not start
//! with `.`, its extension is `json` or `zip`, and it does not live inside an
//! extraction directory (`<root>/<stem>` for some archive `<stem>.zip` found
//! anywhere below the root). Files in there belong to the archive task that
//! extracts them.

use crate::error::{ForgeError, Result};
use glob::{MatchOptions, Pattern, glob_with};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the pipeline does with a discovered file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Converted synchronously.
    Json,
    /// Extracted on the archive worker pool.
    Archive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub kind: InputKind,
}

/// Classify a path by extension.
#[must_use]
pub fn input_kind(path: &Path) -> Option<InputKind> {
    match path.extension()?.to_str()? {
        "json" => Some(InputKind::Json),
        "zip" => Some(InputKind::Archive),
        _ => None,
    }
}

/// True when the base name starts with `.`.
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Directory an archive is extracted into: `<input root>/<archive stem>`,
/// wherever the archive sits below the root.
#[must_use]
pub fn extraction_dir(input_root: &Path, archive: &Path) -> PathBuf {
    input_root.join(archive.file_stem().unwrap_or_default())
}

/// Regular, non-hidden files below `root`, in walk order.
fn walk(root: &Path) -> Result<impl Iterator<Item = PathBuf>> {
    let pattern = format!("{}/**/*", Pattern::escape(&root.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let paths = glob_with(&pattern, options).map_err(|e| ForgeError::Walk {
        pattern: pattern.clone(),
        detail: e.to_string(),
    })?;

    Ok(paths.filter_map(|entry| match entry {
        Ok(path) if path.is_file() && !is_hidden(&path) => Some(path),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "skipping unreadable entry");
            None
        }
    }))
}

/// Extraction directories of every archive currently below `root`.
///
/// # Errors
/// [`ForgeError::Walk`] when the pattern cannot be built.
pub fn extraction_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<_> = walk(root)?
        .filter(|path| input_kind(path) == Some(InputKind::Archive))
        .map(|archive| extraction_dir(root, &archive))
        .collect();
    dirs.sort();
    dirs.dedup();
    Ok(dirs)
}

/// Lazily walk `root` and yield the inputs to convert.
///
/// Extraction directories are listed before the walk starts, so files an
/// archive task writes while the walk is running are never picked up.
/// Unreadable entries are logged and skipped.
///
/// # Errors
/// [`ForgeError::MissingInput`] when `root` is not a directory,
/// [`ForgeError::Walk`] when the pattern cannot be built.
pub fn discover(root: &Path) -> Result<impl Iterator<Item = InputFile>> {
    if !root.is_dir() {
        return Err(ForgeError::MissingInput(root.to_path_buf()));
    }
    let skipped = extraction_dirs(root)?;

    Ok(walk(root)?.filter_map(move |path| {
        let kind = input_kind(&path)?;
        if skipped.iter().any(|dir| path.starts_with(dir)) {
            debug!(path = %path.display(), "skipping extracted file");
            return None;
        }
        Some(InputFile { path, kind })
    }))
}
