//! Tabular export of the summary table.
//!
//! Export is a collaborator seam behind the [`ExportSink`] trait; the
//! default implementation writes one CSV file. NaN statistics are rendered
//! as empty cells so downstream spreadsheet tools show blanks, not "NaN".

use crate::error::PipelineError;
use crate::summary::table::SummaryTable;
use std::path::{Path, PathBuf};

/// Timestamp rendering used in the export file.
const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes the summary table to one tabular file.
pub trait ExportSink {
    /// Write the table; returns the path written.
    fn export(&self, table: &SummaryTable) -> Result<PathBuf, PipelineError>;
}

/// Default sink: one CSV file with a stable name, overwritten on re-runs.
pub struct CsvExportSink {
    path: PathBuf,
}

impl CsvExportSink {
    /// Export file name inside the output directory.
    pub const FILE_NAME: &'static str = "run_summary.csv";

    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            path: output_dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for CsvExportSink {
    fn export(&self, table: &SummaryTable) -> Result<PathBuf, PipelineError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|source| PipelineError::Export {
                path: self.path.clone(),
                source,
            })?;

        let write_err = |source| PipelineError::Export {
            path: self.path.clone(),
            source,
        };

        writer.write_record(table.header()).map_err(write_err)?;

        for row in &table.rows {
            let mut cells = vec![
                row.run_id.to_string(),
                row.annotation.clone(),
                row.window_start.format(EXPORT_TIME_FORMAT).to_string(),
                row.window_end.format(EXPORT_TIME_FORMAT).to_string(),
            ];
            for summary in &row.channels {
                cells.push(render_value(summary.mean));
                cells.push(render_value(summary.std_dev));
            }
            writer.write_record(&cells).map_err(write_err)?;
        }

        writer.flush().map_err(|source| PipelineError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(self.path.clone())
    }
}

/// Render a statistic cell; NaN (undefined) becomes an empty field.
fn render_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
