//! Temporary workspaces and on-disk fixtures.
//!
//! [`TempWorkspace`] gives each test its own `input/`, `output/` and
//! `generatedData/` roots under a temporary directory, plus [`Settings`]
//! pointing at them.

use crate::pipeline::{Layout, Settings};
use anyhow::{Context, Result};
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A temporary directory laid out like a working directory of the tool.
pub struct TempWorkspace {
    temp_dir: TempDir,
    settings: Settings,
}

impl TempWorkspace {
    /// Create a new workspace with an empty `input/` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("create temp dir")?;
        let layout = Layout::rooted_at(temp_dir.path());
        create_dir_all(&layout.input_root).context("create input root")?;
        let settings = Settings {
            archive_workers: 2,
            ..Settings::default()
        }
        .with_layout(layout);
        Ok(Self { temp_dir, settings })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.settings.layout
    }

    /// Path of `relative` inside `input/`.
    #[must_use]
    pub fn input_path(&self, relative: &str) -> PathBuf {
        self.layout().input_root.join(relative)
    }

    /// Path of `relative` inside `output/`.
    #[must_use]
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.layout().output_root.join(relative)
    }

    /// Write `contents` to `input/<relative>`, creating directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_input(&self, relative: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.input_path(relative);
        if let Some(parent) = path.parent() {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write a zip archive to `input/<relative>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn write_zip_input(&self, relative: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
        let path = self.input_path(relative);
        write_zip_fixture(&path, entries)?;
        Ok(path)
    }
}

/// Build a zip archive at `path` holding `entries` (name, contents).
///
/// Names ending in `/` become directory entries. Names are stored verbatim,
/// so hostile names such as `../escape.json` can be produced on purpose.
///
/// # Errors
///
/// Returns an error if the file or any entry cannot be written.
pub fn write_zip_fixture(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options)
                .with_context(|| format!("add directory {name}"))?;
            continue;
        }
        zip.start_file(*name, options)
            .with_context(|| format!("start entry {name}"))?;
        zip.write_all(contents.as_bytes())
            .with_context(|| format!("write entry {name}"))?;
    }
    zip.finish().context("finish zip")?;
    Ok(())
}
