//! Configuration for the labrun pipeline.
//!
//! One `Config` is constructed at startup (file + CLI overrides) and passed
//! by reference into every stage; there is no process-wide mutable state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main configuration for one pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory where input CSV files are discovered.
    pub source_location: PathBuf,

    /// Case-insensitive substrings selecting channel-of-interest columns.
    pub channel_keywords: Vec<String>,

    /// Name of the primary timestamp column (case-sensitive exact match).
    pub timestamp_column: String,

    /// Name of the secondary ordering column.
    pub time_key_column: String,

    /// Name of the free-text annotation column.
    pub annotation_column: String,

    /// Maximum elapsed time between consecutive records before a new run is
    /// forced (in seconds).
    pub gap_threshold_secs: i64,

    /// Length of the trailing summary window.
    #[serde(with = "duration_serde")]
    pub default_window_length: Duration,

    /// Reserved alternate window length; not applied by the aggregation rule.
    #[serde(with = "duration_serde")]
    pub short_window_length: Duration,

    /// Whether to write the summary table.
    pub export_enabled: bool,

    /// Whether to render bar charts of channel means.
    pub plot_enabled: bool,

    /// Output directory; `None` means `<source_location>/output`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_location: PathBuf::from("."),
            channel_keywords: vec![
                "CELL_V_FB".to_string(),
                "PS_CURRENT_DENSITY".to_string(),
                "C_CO2_HI_FB".to_string(),
                "C_OUTLET_FB".to_string(),
            ],
            timestamp_column: "Timestamp".to_string(),
            time_key_column: "Time".to_string(),
            annotation_column: "MATRIX_COMMENT".to_string(),
            gap_threshold_secs: 300, // 5 minutes
            default_window_length: Duration::from_secs(300),
            short_window_length: Duration::from_secs(60),
            export_enabled: true,
            plot_enabled: false,
            output_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a specific file, or the default location.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// is an error.
    pub fn load(path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let config_path = path.cloned().unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labrun")
            .join("config.json")
    }

    /// The effective output directory for exports and charts.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.source_location.join("output"))
    }

    /// The trailing window length as a chrono duration for timestamp
    /// arithmetic.
    pub fn window_length(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.default_window_length.as_secs() as i64)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Serde support for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
