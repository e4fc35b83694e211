//! CSV record loading.
//!
//! Each source file's header is resolved exactly once: the required columns
//! are located by exact name and the channel columns by case-insensitive
//! keyword match. Rows whose timestamp cell fails to parse are dropped and
//! counted; everything else about a row is best-effort.

use crate::config::Config;
use crate::core::stats::ChannelMatcher;
use crate::error::PipelineError;
use crate::loader::record::{parse_numeric, parse_timestamp, Record};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Result of loading one source file.
#[derive(Debug)]
pub struct FileLoad {
    pub records: Vec<Record>,
    /// Rows discarded because their timestamp was missing or unparseable.
    pub dropped_rows: usize,
}

/// Column positions resolved from one file's header.
struct ResolvedHeader {
    timestamp_idx: usize,
    time_key_idx: usize,
    annotation_idx: usize,
    /// `(column index, column name)` for every keyword-matched channel.
    channel_idxs: Vec<(usize, String)>,
}

/// Loads records from CSV instrument logs.
pub struct CsvRecordLoader<'a> {
    timestamp_column: &'a str,
    time_key_column: &'a str,
    annotation_column: &'a str,
    matcher: ChannelMatcher,
}

impl<'a> CsvRecordLoader<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            timestamp_column: &config.timestamp_column,
            time_key_column: &config.time_key_column,
            annotation_column: &config.annotation_column,
            matcher: ChannelMatcher::new(&config.channel_keywords),
        }
    }

    /// Load every parseable row from one file.
    pub fn load_file(&self, path: &Path) -> Result<FileLoad, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let header = self.resolve_header(&mut reader, path)?;
        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut records = Vec::new();
        let mut dropped_rows = 0usize;

        for row in reader.records() {
            let row = row.map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            let timestamp = match row.get(header.timestamp_idx).and_then(parse_timestamp) {
                Some(ts) => ts,
                None => {
                    dropped_rows += 1;
                    debug!(source = %source_id, "dropping row with unparseable timestamp");
                    continue;
                }
            };

            let time_key = row
                .get(header.time_key_idx)
                .and_then(parse_numeric)
                .unwrap_or(f64::NAN);

            let annotation = row
                .get(header.annotation_idx)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();

            let mut channels = BTreeMap::new();
            for (idx, name) in &header.channel_idxs {
                if let Some(value) = row.get(*idx).and_then(parse_numeric) {
                    channels.insert(name.clone(), value);
                }
            }

            records.push(Record {
                timestamp,
                time_key,
                annotation,
                source_id: source_id.clone(),
                channels,
            });
        }

        debug!(
            source = %source_id,
            loaded = records.len(),
            dropped = dropped_rows,
            "loaded source file"
        );

        Ok(FileLoad {
            records,
            dropped_rows,
        })
    }

    /// Locate the required and channel columns in the file header.
    fn resolve_header(
        &self,
        reader: &mut csv::Reader<std::fs::File>,
        path: &Path,
    ) -> Result<ResolvedHeader, PipelineError> {
        let headers = reader
            .headers()
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .clone();

        let find_required = |column: &str| -> Result<usize, PipelineError> {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| PipelineError::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                })
        };

        let timestamp_idx = find_required(self.timestamp_column)?;
        let time_key_idx = find_required(self.time_key_column)?;
        let annotation_idx = find_required(self.annotation_column)?;

        let channel_idxs = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| self.matcher.matches(name))
            .map(|(idx, name)| (idx, name.trim().to_string()))
            .collect();

        Ok(ResolvedHeader {
            timestamp_idx,
            time_key_idx,
            annotation_idx,
            channel_idxs,
        })
    }
}
