//! Merging per-file record sequences into one chronological stream.
//!
//! Stability matters: ties on both sort keys must preserve relative input
//! order so that run boundaries are deterministic across re-runs.

use crate::loader::Record;
use std::cmp::Ordering;

/// Concatenate all sources and stable-sort by `(timestamp, time_key)`.
///
/// The tiebreak is `f64::total_cmp`, a total order: a NaN `time_key` sorts
/// after every numeric key, and rows with equal keys keep their original
/// relative order. No deduplication is performed: identical timestamps from
/// different sources are both retained.
pub fn merge_sorted(per_source: Vec<Vec<Record>>) -> Vec<Record> {
    let mut merged: Vec<Record> = per_source.into_iter().flatten().collect();
    merged.sort_by(compare_records);
    merged
}

fn compare_records(a: &Record, b: &Record) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.time_key.total_cmp(&b.time_key))
}
