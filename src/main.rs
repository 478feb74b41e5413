//! CLI entry point for the Brier trend tool.
//!
//! Loads a Fatebook CSV export, then either prints a console summary of the
//! cumulative and rolling average Brier scores or exports the computed series.

use anyhow::{Context, Result};
use brier_trend::{
    analyzers::{report::build_report, rolling::WindowPolicy, types::ScoreReport},
    config::AnalysisConfig,
    loader::{AmbiguousPolicy, Loader},
    output::{render_summary, write_json, write_series_csv},
    series::SortKey,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
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
#[command(name = "brier_trend")]
#[command(about = "Cumulative and rolling Brier score averages from a Fatebook export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the question count and the latest averages
    Summary {
        /// Fatebook CSV export
        #[arg(value_name = "CSV")]
        source: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
    /// Write every computed series to a file
    Export {
        /// Fatebook CSV export
        #[arg(value_name = "CSV")]
        source: PathBuf,

        /// File to write the series to
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

/// Analysis flags shared by all subcommands. Each one overrides the config file.
#[derive(Args)]
struct AnalysisArgs {
    /// JSON file with analysis settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timestamp that orders the averaged series
    #[arg(long, value_enum)]
    sort_by: Option<SortKey>,

    /// Rolling window policy
    #[arg(long, value_enum)]
    policy: Option<WindowPolicy>,

    /// Rolling window length in days (repeatable)
    #[arg(short, long = "window", value_name = "DAYS")]
    windows: Vec<u32>,

    /// Keep questions resolved as ambiguous
    #[arg(long, default_value_t = false)]
    keep_ambiguous: bool,
}

impl AnalysisArgs {
    fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("failed to load config {path:?}"))?,
            None => AnalysisConfig::default(),
        };

        if let Some(sort_key) = self.sort_by {
            config.sort_key = sort_key;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if !self.windows.is_empty() {
            config.windows_days = self.windows.clone();
        }
        if self.keep_ambiguous {
            config.ambiguous = AmbiguousPolicy::Keep;
        }

        config.validate().context("invalid analysis settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/brier_trend.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("brier_trend.log"));

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
        Commands::Summary { source, analysis } => {
            let config = analysis.resolve()?;
            let report = load_and_report(&source, &config)?;
            println!("{}", render_summary(&report));
        }
        Commands::Export {
            source,
            output,
            format,
            analysis,
        } => {
            let config = analysis.resolve()?;
            let report = load_and_report(&source, &config)?;
            match format {
                ExportFormat::Json => write_json(&output, &report)?,
                ExportFormat::Csv => write_series_csv(&output, &report)?,
            }
            info!(output = %output.display(), "Export complete");
        }
    }

    Ok(())
}

/// Loads the export at `source` and runs the full analysis over it.
#[tracing::instrument(skip_all, fields(source = %source.display()))]
fn load_and_report(source: &Path, config: &AnalysisConfig) -> Result<ScoreReport> {
    let outcome = Loader::fatebook(config.load_options())
        .load_path(source)
        .with_context(|| format!("failed to load {source:?}"))?;

    Ok(build_report(&outcome.records, config))
}
