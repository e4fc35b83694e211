//! Error taxonomy for the labrun pipeline.
//!
//! Fatal errors abort the whole batch before anything is written; row-level
//! problems are recovered inside the loader and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No input files were found at the configured source location.
    ///
    /// This is a configuration problem, not a data problem, and halts the
    /// pipeline before any aggregation or output.
    #[error("no input files found in {}", .location.display())]
    NoSources { location: PathBuf },

    /// A required column is absent from a source file's header.
    #[error("required column '{column}' missing from {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// A source file could not be read or parsed at the file level.
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Filesystem failure outside of CSV parsing.
    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The summary table could not be written.
    ///
    /// Raised after computation completes; computed results are not silently
    /// lost but are not retried.
    #[error("failed to export summary to {}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
