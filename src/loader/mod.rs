//! Record loading: file discovery, CSV parsing, timestamp normalization.
//!
//! The loader turns raw tabular files into [`Record`] values tagged with
//! their originating file. Unparseable rows are dropped here; everything
//! downstream can assume every record carries a valid timestamp.

pub mod csv;
pub mod record;
pub mod sources;

// Re-export commonly used types
pub use csv::{CsvRecordLoader, FileLoad};
pub use record::Record;
pub use sources::{DirectorySourceProvider, SourceProvider, StaticSourceProvider};
