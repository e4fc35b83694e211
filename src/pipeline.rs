//! End-to-end pipeline orchestration.
//!
//! Stages run strictly in order — load, merge/sort, segment, aggregate,
//! sink — in a single pass with no feedback. Any fatal error aborts before
//! an inconsistent table can be written.

use crate::config::Config;
use crate::core::{merge_sorted, segment, summarize_run};
use crate::error::PipelineError;
use crate::loader::{CsvRecordLoader, Record, SourceProvider};
use crate::summary::{ChartSink, ExportSink, SummaryTable};
use std::path::PathBuf;
use tracing::info;

/// What one pipeline execution did, for reporting to the caller.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Input files processed, in load order.
    pub sources: Vec<PathBuf>,
    /// Records retained across all sources.
    pub records_loaded: usize,
    /// Rows dropped for unparseable timestamps.
    pub rows_dropped: usize,
    /// Number of runs segmented.
    pub run_count: usize,
    /// Matched channel names, in first-appearance order.
    pub channels: Vec<String>,
    /// Path of the exported table, when export ran.
    pub export_path: Option<PathBuf>,
    /// Paths of rendered charts, when plotting ran.
    pub chart_paths: Vec<PathBuf>,
}

/// Execute the full pipeline.
///
/// The export and chart collaborators are only invoked when enabled in the
/// configuration; passing `None` disables them regardless.
pub fn execute(
    config: &Config,
    provider: &dyn SourceProvider,
    exporter: Option<&dyn ExportSink>,
    charter: Option<&dyn ChartSink>,
) -> Result<PipelineReport, PipelineError> {
    // Stage 1: discovery and loading. Zero sources is fatal before any
    // aggregation happens.
    let sources = provider.list_sources()?;
    info!(count = sources.len(), "discovered input files");

    let loader = CsvRecordLoader::from_config(config);
    let mut per_source = Vec::with_capacity(sources.len());
    let mut rows_dropped = 0usize;
    for path in &sources {
        let load = loader.load_file(path)?;
        rows_dropped += load.dropped_rows;
        per_source.push(load.records);
    }

    // Stage 2: one chronological stream.
    let records = merge_sorted(per_source);
    let records_loaded = records.len();
    info!(records = records_loaded, dropped = rows_dropped, "merged record stream");

    // The dataset-wide channel list, in first-appearance order over the
    // sorted stream, fixes the column layout for every summary row.
    let channels = collect_channels(&records);

    // Stage 3: segmentation.
    let runs = segment(records, config.gap_threshold_secs);
    info!(runs = runs.len(), "segmented runs");

    // Stage 4: trailing-window aggregation, one row per run.
    let window_length = config.window_length();
    let mut table = SummaryTable::new(channels.clone());
    for run in &runs {
        let row = summarize_run(run, &channels, window_length);
        table.push(row);
    }

    // Stage 5: sink. Emission order already matches run order, but the
    // export contract requires the sort regardless.
    table.sort_by_run_id();

    let mut report = PipelineReport {
        sources,
        records_loaded,
        rows_dropped,
        run_count: runs.len(),
        channels,
        ..PipelineReport::default()
    };

    if config.export_enabled {
        if let Some(exporter) = exporter {
            let path = exporter.export(&table)?;
            info!(path = %path.display(), rows = table.len(), "exported summary table");
            report.export_path = Some(path);
        }
    }

    if config.plot_enabled {
        if let Some(charter) = charter {
            report.chart_paths = charter.render(&table)?;
            info!(charts = report.chart_paths.len(), "rendered charts");
        }
    }

    Ok(report)
}

/// Matched channel names in order of first appearance in the sorted stream.
fn collect_channels(records: &[Record]) -> Vec<String> {
    let mut channels: Vec<String> = Vec::new();
    for record in records {
        for name in record.channels.keys() {
            if !channels.iter().any(|c| c == name) {
                channels.push(name.clone());
            }
        }
    }
    channels
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(offset_secs: i64, channel: &str) -> Record {
        let base = NaiveDate::from_ymd_opt(2025, 4, 8)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut channels = BTreeMap::new();
        channels.insert(channel.to_string(), 1.0);
        Record {
            timestamp: base + chrono::Duration::seconds(offset_secs),
            time_key: offset_secs as f64,
            annotation: String::new(),
            source_id: "test.csv".to_string(),
            channels,
        }
    }

    #[test]
    fn test_channel_order_is_first_appearance() {
        let records = vec![
            record(0, "B_CHANNEL"),
            record(1, "A_CHANNEL"),
            record(2, "B_CHANNEL"),
        ];
        assert_eq!(collect_channels(&records), vec!["B_CHANNEL", "A_CHANNEL"]);
    }
}
