//! Channel matching and summary statistics.
//!
//! Statistics are deliberately minimal: mean and sample standard deviation
//! over the values present in a window. Absence of data is encoded as NaN,
//! never as an error, so a sparse channel flows through the pipeline as data.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Matches channel columns by case-insensitive substring.
///
/// The matcher is deliberately loose: a column is a channel of interest if
/// ANY configured keyword appears anywhere in its name, so renamed variants
/// (suffixes, casing) are captured without reconfiguration.
#[derive(Debug, Clone)]
pub struct ChannelMatcher {
    keywords_lower: Vec<String>,
}

impl ChannelMatcher {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords_lower: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Whether a column name matches any configured keyword.
    pub fn matches(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        self.keywords_lower.iter().any(|k| column.contains(k))
    }
}

/// Mean and sample standard deviation for one channel over one window.
///
/// NaN encodes "undefined": a single sample yields a defined mean and a NaN
/// std-dev, an empty sample yields NaN for both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub mean: f64,
    pub std_dev: f64,
}

impl ChannelSummary {
    /// The all-undefined summary, for channels absent from a window.
    pub fn undefined() -> Self {
        Self {
            mean: f64::NAN,
            std_dev: f64::NAN,
        }
    }

    /// Compute mean and sample std-dev over a slice of values.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::undefined();
        }
        Self {
            mean: values.mean(),
            std_dev: values.std_dev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_is_case_insensitive_substring() {
        let matcher = ChannelMatcher::new(&["cell_v_fb".to_string(), "CURRENT".to_string()]);
        assert!(matcher.matches("CELL_V_FB"));
        assert!(matcher.matches("cell_v_fb_raw"));
        assert!(matcher.matches("ps_current_density"));
        assert!(!matcher.matches("TEMPERATURE"));
        assert!(!matcher.matches("Timestamp"));
    }

    #[test]
    fn test_mean_and_std_dev() {
        let summary = ChannelSummary::from_values(&[1.0, 2.0, 3.0]);
        assert!((summary.mean - 2.0).abs() < 1e-12);
        assert!((summary.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_defined_mean_only() {
        let summary = ChannelSummary::from_values(&[4.2]);
        assert!((summary.mean - 4.2).abs() < 1e-12);
        assert!(summary.std_dev.is_nan());
    }

    #[test]
    fn test_empty_is_all_undefined() {
        let summary = ChannelSummary::from_values(&[]);
        assert!(summary.mean.is_nan());
        assert!(summary.std_dev.is_nan());
    }
}
