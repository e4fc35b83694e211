//! Input file discovery.
//!
//! Discovery is a collaborator seam: the pipeline only sees the
//! [`SourceProvider`] trait, so tests can substitute a fixed file list.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};

/// Provides the set of input files for one pipeline execution.
pub trait SourceProvider {
    /// List the input files to load.
    ///
    /// An empty list is a configuration error: the provider must return
    /// [`PipelineError::NoSources`] naming the searched location.
    fn list_sources(&self) -> Result<Vec<PathBuf>, PipelineError>;
}

/// Lists every `*.csv` file directly inside one directory.
pub struct DirectorySourceProvider {
    dir: PathBuf,
}

impl DirectorySourceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SourceProvider for DirectorySourceProvider {
    fn list_sources(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // A missing directory reports the same way as an empty one:
            // nothing to process at the configured location.
            Err(_) => {
                return Err(PipelineError::NoSources {
                    location: self.dir.clone(),
                })
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && has_csv_extension(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(PipelineError::NoSources {
                location: self.dir.clone(),
            });
        }

        // Deterministic load order regardless of directory iteration order.
        files.sort();
        Ok(files)
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// A fixed file list, used by tests and by callers that already know
/// exactly which files to process.
pub struct StaticSourceProvider {
    files: Vec<PathBuf>,
    location: PathBuf,
}

impl StaticSourceProvider {
    pub fn new(files: Vec<PathBuf>, location: impl Into<PathBuf>) -> Self {
        Self {
            files,
            location: location.into(),
        }
    }
}

impl SourceProvider for StaticSourceProvider {
    fn list_sources(&self) -> Result<Vec<PathBuf>, PipelineError> {
        if self.files.is_empty() {
            return Err(PipelineError::NoSources {
                location: self.location.clone(),
            });
        }
        Ok(self.files.clone())
    }
}
