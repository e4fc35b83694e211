//! Summary table accumulation and the export/chart collaborator seams.

pub mod chart;
pub mod export;
pub mod table;

// Re-export commonly used types
pub use chart::{ChartSink, SvgChartSink};
pub use export::{CsvExportSink, ExportSink};
pub use table::{RunSummary, SummaryTable};
