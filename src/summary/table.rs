//! The accumulated per-run summary table.

use crate::core::stats::ChannelSummary;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One summary row: a run and its per-channel statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: u64,
    pub annotation: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    /// Parallel to the table's channel list, one slot per matched channel.
    pub channels: Vec<ChannelSummary>,
}

/// Per-run summaries accumulated in one uniform table.
///
/// The table performs no computation; it is the pass-through boundary
/// between aggregation and the export/chart collaborators.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    /// Matched channel names, in first-appearance order over the merged
    /// sorted record stream. Every row has one summary slot per entry.
    pub channels: Vec<String>,
    pub rows: Vec<RunSummary>,
}

impl SummaryTable {
    pub fn new(channels: Vec<String>) -> Self {
        Self {
            channels,
            rows: Vec::new(),
        }
    }

    /// Append one run's summary row.
    pub fn push(&mut self, row: RunSummary) {
        debug_assert_eq!(row.channels.len(), self.channels.len());
        self.rows.push(row);
    }

    /// Re-sort rows by ascending `run_id`.
    ///
    /// Emission order already matches run order in the sequential pipeline,
    /// but the export contract requires the sort regardless.
    pub fn sort_by_run_id(&mut self) {
        self.rows.sort_by_key(|row| row.run_id);
    }

    /// Header cells: the fixed columns followed by a mean/stddev pair per
    /// channel.
    pub fn header(&self) -> Vec<String> {
        let mut cells = vec![
            "run_id".to_string(),
            "annotation".to_string(),
            "window_start".to_string(),
            "window_end".to_string(),
        ];
        for channel in &self.channels {
            cells.push(format!("{channel}_mean"));
            cells.push(format!("{channel}_stddev"));
        }
        cells
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
