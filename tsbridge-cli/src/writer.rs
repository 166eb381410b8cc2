//! Output file handling.
//!
//! Writes generated modules to disk (or reports what would be written in
//! dry-run mode) and compares existing output against fresh content.

use std::path::{Path, PathBuf};

use crate::error::{CliResult, WriteError};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf, bytes: usize },

    /// Dry run; nothing touched the disk.
    DryRun { path: PathBuf, content: String },

    /// The file already held this content.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    /// Path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::DryRun { path, .. }
            | WriteResult::Unchanged { path } => path,
        }
    }
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write `content` to `path`, creating parent directories.
    ///
    /// Files whose content is already identical are left untouched.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                path: path.to_path_buf(),
                content: content.to_string(),
            });
        }

        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Whether running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Whether the file at `path` holds `content`, ignoring surrounding
/// whitespace.
pub fn is_up_to_date(path: &Path, content: &str) -> CliResult<bool> {
    let existing = std::fs::read_to_string(path)?;
    Ok(existing.trim() == content.trim())
}
