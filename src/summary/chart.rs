//! Bar-chart rendering of per-run channel means.
//!
//! Charting is a collaborator seam behind the [`ChartSink`] trait. The
//! default implementation writes one standalone SVG bar chart per channel,
//! bars keyed by run id. Runs with an undefined mean are skipped in that
//! channel's chart.

use crate::error::PipelineError;
use crate::summary::table::SummaryTable;
use std::fmt::Write as _;
use std::path::PathBuf;

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN: f64 = 40.0;

/// Renders charts from the summary table.
pub trait ChartSink {
    /// Render one chart per channel; returns the paths written.
    fn render(&self, table: &SummaryTable) -> Result<Vec<PathBuf>, PipelineError>;
}

/// Default sink: one SVG bar chart per `<channel>_mean` column.
pub struct SvgChartSink {
    output_dir: PathBuf,
}

impl SvgChartSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ChartSink for SvgChartSink {
    fn render(&self, table: &SummaryTable) -> Result<Vec<PathBuf>, PipelineError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| PipelineError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for (idx, channel) in table.channels.iter().enumerate() {
            let bars: Vec<(u64, f64)> = table
                .rows
                .iter()
                .filter_map(|row| {
                    let mean = row.channels[idx].mean;
                    (!mean.is_nan()).then_some((row.run_id, mean))
                })
                .collect();

            if bars.is_empty() {
                continue;
            }

            let svg = render_bar_chart(&format!("{channel}_mean"), &bars);
            let path = self.output_dir.join(format!("{}_mean.svg", sanitize(channel)));
            std::fs::write(&path, svg).map_err(|source| PipelineError::Io {
                path: path.clone(),
                source,
            })?;
            paths.push(path);
        }

        Ok(paths)
    }
}

/// File-name-safe version of a channel name.
fn sanitize(channel: &str) -> String {
    channel
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Render a minimal SVG bar chart of `(run_id, mean)` pairs.
fn render_bar_chart(title: &str, bars: &[(u64, f64)]) -> String {
    // Scale against the data range, anchored at zero so bar heights stay
    // comparable across positive-valued channels.
    let max = bars.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max).max(0.0);
    let min = bars.iter().map(|(_, v)| *v).fold(f64::MAX, f64::min).min(0.0);
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };

    let plot_width = CHART_WIDTH - 2.0 * MARGIN;
    let plot_height = CHART_HEIGHT - 2.0 * MARGIN;
    let slot = plot_width / bars.len() as f64;
    let bar_width = (slot * 0.8).max(1.0);
    let baseline_y = MARGIN + plot_height * (max / span);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="20" text-anchor="middle" font-family="sans-serif" font-size="14">{title}</text>"#,
        CHART_WIDTH / 2.0
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{MARGIN}" y1="{baseline_y}" x2="{}" y2="{baseline_y}" stroke="black"/>"#,
        CHART_WIDTH - MARGIN
    );

    for (i, (run_id, value)) in bars.iter().enumerate() {
        let height = (value / span * plot_height).abs();
        let x = MARGIN + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = if *value >= 0.0 { baseline_y - height } else { baseline_y };
        let _ = writeln!(
            svg,
            r#"  <rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="steelblue"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="10">{run_id}</text>"#,
            x + bar_width / 2.0,
            CHART_HEIGHT - MARGIN / 2.0
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::ChannelSummary;
    use crate::summary::table::RunSummary;
    use chrono::NaiveDate;

    fn row(run_id: u64, mean: f64) -> RunSummary {
        let ts = NaiveDate::from_ymd_opt(2025, 4, 8)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        RunSummary {
            run_id,
            annotation: String::new(),
            window_start: ts,
            window_end: ts,
            channels: vec![ChannelSummary {
                mean,
                std_dev: f64::NAN,
            }],
        }
    }

    #[test]
    fn test_renders_one_chart_per_channel() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = SummaryTable::new(vec!["CELL_V_FB".to_string()]);
        table.push(row(1, 3.2));
        table.push(row(2, 3.4));

        let sink = SvgChartSink::new(dir.path());
        let paths = sink.render(&table).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("CELL_V_FB_mean.svg"));

        let svg = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("CELL_V_FB_mean"));
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_all_undefined_channel_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = SummaryTable::new(vec!["CELL_V_FB".to_string()]);
        table.push(row(1, f64::NAN));

        let sink = SvgChartSink::new(dir.path());
        let paths = sink.render(&table).unwrap();
        assert!(paths.is_empty());
    }
}
