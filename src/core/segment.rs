//! Run segmentation over the sorted record stream.
//!
//! A run is a maximal contiguous group of records sharing one annotation
//! with no internal time gap exceeding the configured threshold. Boundaries
//! are detected in a single forward pass with an explicit previous-record
//! tracker.

use crate::loader::Record;
use chrono::NaiveDateTime;

/// A maximal contiguous group of records sharing one annotation.
///
/// Immutable once formed; consumed by the window aggregator.
#[derive(Debug, Clone)]
pub struct Run {
    /// 1-indexed, assigned in segmentation order.
    pub run_id: u64,
    /// Annotation shared by the run, taken from its first record.
    pub annotation: String,
    /// Earliest timestamp in the run.
    pub start_time: NaiveDateTime,
    /// Latest timestamp in the run.
    pub end_time: NaiveDateTime,
    pub records: Vec<Record>,
}

impl Run {
    fn open(run_id: u64, first: Record) -> Self {
        Self {
            run_id,
            annotation: first.annotation.clone(),
            start_time: first.timestamp,
            end_time: first.timestamp,
            records: vec![first],
        }
    }

    fn push(&mut self, record: Record) {
        // Input is sorted, so min/max track the first and latest record.
        self.end_time = record.timestamp;
        self.records.push(record);
    }
}

/// Partition a sorted record stream into runs.
///
/// A new run starts when the annotation changes or when the elapsed time
/// since the previous record exceeds `gap_threshold_secs`. The first record
/// always opens run 1. Empty annotations compare by ordinary string
/// equality: consecutive empty annotations stay in one run, while an empty
/// annotation adjacent to a non-empty one splits.
pub fn segment(records: Vec<Record>, gap_threshold_secs: i64) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut previous: Option<(String, NaiveDateTime)> = None;

    for record in records {
        let starts_new_run = match &previous {
            None => true,
            Some((prev_annotation, prev_timestamp)) => {
                // Millisecond resolution: a fractional-second overshoot of
                // the threshold still counts as a gap.
                let elapsed_ms = (record.timestamp - *prev_timestamp).num_milliseconds();
                record.annotation != *prev_annotation
                    || elapsed_ms > gap_threshold_secs.saturating_mul(1000)
            }
        };
        previous = Some((record.annotation.clone(), record.timestamp));

        if starts_new_run {
            let run_id = runs.len() as u64 + 1;
            runs.push(Run::open(run_id, record));
        } else if let Some(current) = runs.last_mut() {
            current.push(record);
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(offset_secs: i64, annotation: &str) -> Record {
        let base = NaiveDate::from_ymd_opt(2025, 4, 8)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Record {
            timestamp: base + chrono::Duration::seconds(offset_secs),
            time_key: offset_secs as f64,
            annotation: annotation.to_string(),
            source_id: "test.csv".to_string(),
            channels: BTreeMap::new(),
        }
    }

    #[test]
    fn test_constant_annotation_small_gaps_is_one_run() {
        let runs = segment(
            vec![record(0, "A"), record(60, "A"), record(120, "A")],
            300,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, 1);
        assert_eq!(runs[0].start_time, record(0, "A").timestamp);
        assert_eq!(runs[0].end_time, record(120, "A").timestamp);
        assert_eq!(runs[0].records.len(), 3);
    }

    #[test]
    fn test_gap_beyond_threshold_splits_despite_same_annotation() {
        let runs = segment(vec![record(0, "A"), record(60, "A"), record(400, "A")], 300);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].records.len(), 2);
        assert_eq!(runs[0].end_time, record(60, "A").timestamp);
        assert_eq!(runs[1].run_id, 2);
        assert_eq!(runs[1].records.len(), 1);
        assert_eq!(runs[1].start_time, record(400, "A").timestamp);
    }

    #[test]
    fn test_gap_exactly_at_threshold_does_not_split() {
        let runs = segment(vec![record(0, "A"), record(300, "A")], 300);
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn test_fractional_second_gap_beyond_threshold_splits() {
        let base = record(0, "A");
        let mut late = record(300, "A");
        // 300.5 s elapsed: over the 300 s threshold by half a second.
        late.timestamp = late.timestamp + chrono::Duration::milliseconds(500);

        let runs = segment(vec![base, late], 300);
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_annotation_change_splits_regardless_of_gap() {
        let runs = segment(vec![record(0, "A"), record(10, "B")], 300);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].annotation, "A");
        assert_eq!(runs[1].annotation, "B");
    }

    #[test]
    fn test_empty_annotations_compare_as_ordinary_values() {
        // Consecutive empty annotations stay together.
        let runs = segment(vec![record(0, ""), record(10, "")], 300);
        assert_eq!(runs.len(), 1);

        // An empty annotation adjacent to a non-empty one splits.
        let runs = segment(vec![record(0, "A"), record(10, ""), record(20, "")], 300);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].annotation, "");
        assert_eq!(runs[1].records.len(), 2);
    }

    #[test]
    fn test_run_ids_are_monotonic_from_one() {
        let runs = segment(
            vec![record(0, "A"), record(10, "B"), record(500, "B")],
            300,
        );
        let ids: Vec<u64> = runs.iter().map(|r| r.run_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input_yields_no_runs() {
        assert!(segment(Vec::new(), 300).is_empty());
    }
}
