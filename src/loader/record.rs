//! The record type shared by every pipeline stage.
//!
//! A record is one timestamped observation row from an instrument log.
//! Channel values are resolved against the source header once at load time,
//! so downstream stages never touch raw column indices.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timestamped observation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Primary timestamp. Rows whose timestamp fails to parse are dropped
    /// at load time, so this is always present.
    pub timestamp: NaiveDateTime,
    /// Secondary sort key (e.g. elapsed seconds). NaN when the cell was
    /// blank or unparseable; the sorter treats NaN as equal.
    pub time_key: f64,
    /// Free-text annotation for this row. May be empty.
    pub annotation: String,
    /// Name of the originating file.
    pub source_id: String,
    /// Matched channel values present in this row, keyed by column name.
    /// Blank or non-numeric cells are simply absent.
    pub channels: BTreeMap<String, f64>,
}

/// Timestamp formats accepted by the loader, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %H:%M",
];

/// Parse a timestamp cell, trying each supported format in order.
///
/// Returns `None` for blank or unrecognized values; the caller drops the row.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // RFC3339 with an explicit offset first (e.g. exported logger files).
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parse a numeric cell. Blank and non-numeric values yield `None`.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}
