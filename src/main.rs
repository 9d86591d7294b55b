//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for analyzing one city's trip file under a
//! month/weekday filter and for listing the configured cities.

use anyhow::{Result, bail};
use bikeshare_stats::analyzers::analyzer::analyze;
use bikeshare_stats::calendar::FilterParams;
use bikeshare_stats::config::{AnalysisConfig, CityCatalog};
use bikeshare_stats::loader::load_dataset;
use bikeshare_stats::output::{
    RunSummary, append_record, print_json, print_pretty, render_report, render_rows,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over bike-share trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a city's trips by month and weekday and report statistics
    Analyze {
        /// City name from the catalog (e.g. "Chicago")
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        city: Option<String>,

        /// Trip CSV to analyze instead of a catalog city
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// January through July, or All
        #[arg(short, long, default_value = "All")]
        month: String,

        /// Monday through Sunday, or All
        #[arg(short, long, default_value = "All")]
        day: String,

        /// Include per-user-type durations and per-group age statistics
        #[arg(short, long, default_value_t = false)]
        extended: bool,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print the first N kept trips after the report
        #[arg(short, long, default_value_t = 0)]
        rows: usize,

        /// Optional: CSV file to append a one-line run summary to
        #[arg(long)]
        summary_csv: Option<String>,
    },
    /// List the configured cities and their trip files
    ListCities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            city,
            file,
            month,
            day,
            extended,
            json,
            rows,
            summary_csv,
        } => {
            let (city, path) = match (city, file) {
                (Some(city), _) => {
                    let catalog = CityCatalog::from_env()?;
                    let (name, path) = catalog.resolve(&city)?;
                    (name.to_string(), path)
                }
                (None, Some(file)) => (file.display().to_string(), file),
                (None, None) => bail!("either --city or --file is required"),
            };

            let params = FilterParams::new(&month, &day)?;
            run_analysis(
                &city,
                &path,
                &params,
                extended,
                json,
                rows,
                summary_csv.as_deref(),
            )?;
        }
        Commands::ListCities => {
            let catalog = CityCatalog::from_env()?;
            for (city, path) in catalog.iter() {
                info!(
                    city,
                    path = %path.display(),
                    exists = path.exists(),
                    "City"
                );
            }
        }
    }

    Ok(())
}

/// Loads, filters and aggregates one trip file, then prints the report.
#[tracing::instrument(skip(path, summary_csv), fields(path = %path.display()))]
fn run_analysis(
    city: &str,
    path: &Path,
    params: &FilterParams,
    extended: bool,
    json: bool,
    rows: usize,
    summary_csv: Option<&str>,
) -> Result<()> {
    let config = AnalysisConfig::from_env();
    let dataset = load_dataset(path)?;
    let (report, partitions) = analyze(&dataset, params, &config, extended)?;
    print_pretty(&report.filter);

    if json {
        print_json(&report)?;
    } else {
        println!("{}", render_report(city, &report));
    }

    if rows > 0 {
        println!("{}", render_rows(&partitions.kept, 0, rows));
    }

    if let Some(summary_path) = summary_csv {
        append_record(summary_path, &RunSummary::from_report(city, &report))?;
        info!(path = summary_path, "Run summary appended");
    }

    Ok(())
}
