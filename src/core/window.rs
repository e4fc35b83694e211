//! Trailing window selection and per-run aggregation.
//!
//! Instrument readings during the initial transient of a long run are
//! unrepresentative, so only the settled tail of each run is summarized.
//! Runs shorter than the window length are summarized whole.

use crate::core::segment::Run;
use crate::core::stats::ChannelSummary;
use crate::loader::Record;
use crate::summary::RunSummary;
use chrono::{Duration, NaiveDateTime};

/// The trailing sub-interval of one run used for summary statistics.
#[derive(Debug)]
pub struct RunWindow<'a> {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub records: Vec<&'a Record>,
}

/// Select the trailing window of a run.
///
/// If the run's total duration does not exceed `window_length` the window is
/// the entire run. Otherwise the window covers `[end - window_length, end]`
/// and holds the records with `timestamp >= start`. Note the reported start
/// is the computed boundary, not the first retained record's timestamp.
pub fn select_window(run: &Run, window_length: Duration) -> RunWindow<'_> {
    let duration = run.end_time - run.start_time;

    if duration <= window_length {
        return RunWindow {
            start: run.start_time,
            end: run.end_time,
            records: run.records.iter().collect(),
        };
    }

    let start = run.end_time - window_length;
    RunWindow {
        start,
        end: run.end_time,
        records: run
            .records
            .iter()
            .filter(|r| r.timestamp >= start)
            .collect(),
    }
}

/// Summarize one run over its trailing window.
///
/// `channels` is the dataset-wide matched-channel list; every run reports a
/// summary slot for each of them so all rows share one shape. A channel with
/// no values in this window reports NaN for both statistics.
pub fn summarize_run(run: &Run, channels: &[String], window_length: Duration) -> RunSummary {
    let window = select_window(run, window_length);

    let summaries = channels
        .iter()
        .map(|channel| {
            let values: Vec<f64> = window
                .records
                .iter()
                .filter_map(|r| r.channels.get(channel).copied())
                .collect();
            ChannelSummary::from_values(&values)
        })
        .collect();

    RunSummary {
        run_id: run.run_id,
        annotation: run.annotation.clone(),
        window_start: window.start,
        window_end: window.end,
        channels: summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(offset_secs: i64, channel_value: Option<f64>) -> Record {
        let base = NaiveDate::from_ymd_opt(2025, 4, 8)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut channels = BTreeMap::new();
        if let Some(v) = channel_value {
            channels.insert("CELL_V_FB".to_string(), v);
        }
        Record {
            timestamp: base + Duration::seconds(offset_secs),
            time_key: offset_secs as f64,
            annotation: "A".to_string(),
            source_id: "test.csv".to_string(),
            channels,
        }
    }

    fn run_of(records: Vec<Record>) -> Run {
        crate::core::segment::segment(records, i64::MAX)
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_short_run_window_is_whole_run() {
        // 3-minute run, 5-minute window.
        let run = run_of(vec![record(0, None), record(90, None), record(180, None)]);
        let window = select_window(&run, Duration::minutes(5));
        assert_eq!(window.start, run.start_time);
        assert_eq!(window.end, run.end_time);
        assert_eq!(window.records.len(), 3);
    }

    #[test]
    fn test_long_run_window_is_trailing_tail() {
        // 10-minute run, 5-minute window: only the last 5 minutes survive.
        let run = run_of(vec![
            record(0, None),
            record(200, None),
            record(400, None),
            record(600, None),
        ]);
        let window = select_window(&run, Duration::minutes(5));
        assert_eq!(window.end, run.end_time);
        assert_eq!(window.start, run.end_time - Duration::minutes(5));
        // t=400 and t=600 are >= end - 300 = 300.
        assert_eq!(window.records.len(), 2);
        assert!(window.records.iter().all(|r| r.timestamp >= window.start));
    }

    #[test]
    fn test_summarize_run_basic_statistics() {
        let run = run_of(vec![
            record(0, Some(1.0)),
            record(10, Some(2.0)),
            record(20, Some(3.0)),
        ]);
        let summary = summarize_run(&run, &["CELL_V_FB".to_string()], Duration::minutes(5));

        assert_eq!(summary.run_id, 1);
        assert_eq!(summary.channels.len(), 1);
        assert!((summary.channels[0].mean - 2.0).abs() < 1e-12);
        assert!((summary.channels[0].std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_skips_missing_values() {
        let run = run_of(vec![
            record(0, Some(1.0)),
            record(10, None),
            record(20, Some(3.0)),
        ]);
        let summary = summarize_run(&run, &["CELL_V_FB".to_string()], Duration::minutes(5));
        assert!((summary.channels[0].mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_absent_channel_reports_undefined() {
        let run = run_of(vec![record(0, None)]);
        let summary = summarize_run(&run, &["CELL_V_FB".to_string()], Duration::minutes(5));
        assert!(summary.channels[0].mean.is_nan());
        assert!(summary.channels[0].std_dev.is_nan());
    }

    #[test]
    fn test_statistics_use_window_not_whole_run() {
        // Early values fall outside the trailing window and must not
        // contribute to the mean.
        let run = run_of(vec![
            record(0, Some(100.0)),
            record(400, Some(1.0)),
            record(600, Some(3.0)),
        ]);
        let summary = summarize_run(&run, &["CELL_V_FB".to_string()], Duration::minutes(5));
        assert!((summary.channels[0].mean - 2.0).abs() < 1e-12);
    }
}
