//! labrun CLI
//!
//! Segment laboratory instrument logs into experimental runs and summarize
//! trailing-window statistics.

use clap::{Parser, Subcommand};
use labrun::{
    pipeline, Config, CsvExportSink, DirectorySourceProvider, SourceProvider, SvgChartSink,
    VERSION,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labrun")]
#[command(version = VERSION)]
#[command(about = "Summarize instrument-log runs over trailing windows", long_about = None)]
struct Cli {
    /// Path to a configuration file (defaults to the per-user location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over the configured source directory
    Run {
        /// Directory containing the input CSV files
        #[arg(long)]
        source: Option<PathBuf>,

        /// Channel keywords (comma-separated, case-insensitive substrings)
        #[arg(long)]
        keywords: Option<String>,

        /// Trailing window length in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// Gap threshold in seconds before a new run is forced
        #[arg(long)]
        gap_secs: Option<i64>,

        /// Output directory (defaults to <source>/output)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip writing the summary table
        #[arg(long)]
        no_export: bool,

        /// Render one bar chart per channel mean
        #[arg(long)]
        plot: bool,
    },

    /// List the input files discovery would use
    Sources {
        /// Directory containing the input CSV files
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write the shown configuration to the per-user config file
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Run {
            source,
            keywords,
            window_secs,
            gap_secs,
            output,
            no_export,
            plot,
        } => {
            let config = apply_overrides(
                config, source, keywords, window_secs, gap_secs, output, no_export, plot,
            );
            cmd_run(&config);
        }
        Commands::Sources { source } => {
            let mut config = config;
            if let Some(source) = source {
                config.source_location = source;
            }
            cmd_sources(&config);
        }
        Commands::Config { save } => {
            cmd_config(&config, save);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_overrides(
    mut config: Config,
    source: Option<PathBuf>,
    keywords: Option<String>,
    window_secs: Option<u64>,
    gap_secs: Option<i64>,
    output: Option<PathBuf>,
    no_export: bool,
    plot: bool,
) -> Config {
    if let Some(source) = source {
        config.source_location = source;
    }
    if let Some(keywords) = keywords {
        config.channel_keywords = keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
    }
    if let Some(secs) = window_secs {
        config.default_window_length = std::time::Duration::from_secs(secs);
    }
    if let Some(secs) = gap_secs {
        config.gap_threshold_secs = secs;
    }
    if output.is_some() {
        config.output_dir = output;
    }
    if no_export {
        config.export_enabled = false;
    }
    if plot {
        config.plot_enabled = true;
    }
    config
}

fn cmd_run(config: &Config) {
    println!("labrun v{VERSION}");
    println!("  Source: {}", config.source_location.display());
    println!("  Keywords: {}", config.channel_keywords.join(", "));
    println!(
        "  Window: {}s, gap threshold: {}s",
        config.default_window_length.as_secs(),
        config.gap_threshold_secs
    );
    println!();

    let provider = DirectorySourceProvider::new(&config.source_location);
    let output_dir = config.resolved_output_dir();
    let exporter = CsvExportSink::new(&output_dir);
    let charter = SvgChartSink::new(&output_dir);

    let report = match pipeline::execute(config, &provider, Some(&exporter), Some(&charter)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Processed {} file(s):", report.sources.len());
    for path in &report.sources {
        println!("  {}", path.display());
    }
    println!();
    println!(
        "  Records: {} loaded, {} dropped",
        report.records_loaded, report.rows_dropped
    );
    println!("  Runs: {}", report.run_count);
    println!("  Channels: {}", report.channels.join(", "));

    if let Some(path) = &report.export_path {
        println!();
        println!("Exported summary to {}", path.display());
    }
    for path in &report.chart_paths {
        println!("Rendered chart {}", path.display());
    }
}

fn cmd_sources(config: &Config) {
    let provider = DirectorySourceProvider::new(&config.source_location);
    match provider.list_sources() {
        Ok(files) => {
            println!(
                "Found {} file(s) in {}:",
                files.len(),
                config.source_location.display()
            );
            for path in files {
                println!("  {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config(config: &Config, save: bool) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing configuration: {e}");
            std::process::exit(1);
        }
    }

    if save {
        if let Err(e) = config.save() {
            eprintln!("Error saving configuration: {e}");
            std::process::exit(1);
        }
        println!();
        println!("Saved configuration to {}", Config::config_path().display());
    }
}
