//! labrun - Segment laboratory instrument logs into experimental runs and
//! summarize trailing-window statistics.
//!
//! The pipeline turns a flat, multi-file, timestamped instrument log into
//! discrete labeled runs and one summary row per run: mean and sample
//! standard deviation of each channel of interest over the trailing window
//! of the run.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             labrun                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────┐  ┌─────────┐  ┌───────────┐  ┌────────┐  ┌────────┐ │
//! │  │ Loader │─▶│ Merger/ │─▶│ Segmenter │─▶│ Window │─▶│ Summary│ │
//! │  │  (CSV) │  │ Sorter  │  │ (runs)    │  │ stats  │  │  sink  │ │
//! │  └────────┘  └─────────┘  └───────────┘  └────────┘  └────────┘ │
//! │                                                          │       │
//! │                                              ┌───────────┴────┐  │
//! │                                              ▼                ▼  │
//! │                                         CSV export       SVG bar │
//! │                                                           charts │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows strictly left to right in a single pass; a fatal error at any
//! stage aborts the batch before anything is written.
//!
//! # Example
//!
//! ```no_run
//! use labrun::{pipeline, Config, CsvExportSink, DirectorySourceProvider};
//!
//! let config = Config::default();
//! let provider = DirectorySourceProvider::new(&config.source_location);
//! let exporter = CsvExportSink::new(config.resolved_output_dir());
//!
//! let report = pipeline::execute(&config, &provider, Some(&exporter), None)
//!     .expect("pipeline failed");
//! println!("{} runs summarized", report.run_count);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod summary;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{ChannelMatcher, ChannelSummary, Run};
pub use error::PipelineError;
pub use loader::{CsvRecordLoader, DirectorySourceProvider, Record, SourceProvider};
pub use pipeline::PipelineReport;
pub use summary::{ChartSink, CsvExportSink, ExportSink, RunSummary, SummaryTable, SvgChartSink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
