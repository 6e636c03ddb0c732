//! trainreport - turn a training roster into compliance reports.
//!
//! Reads the roster, keeps each person's most recent completion of every
//! training, and writes three JSON reports: completion counts, fiscal-year
//! completions, and expired or soon-to-expire trainings.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trainreport_core::config::Config;
use trainreport_core::dates::parse_check_date;

// ============================================================================
// Constants
// ============================================================================

/// Log level used when RUST_LOG is not set. Skipped entries log at warn.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "trainreport", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir, then built-in values)
    #[arg(long, env = "TRAINREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Roster file: JSON array of people with their completions
    #[arg(long, env = "TRAINREPORT_INPUT")]
    input: Option<PathBuf>,

    /// Directory the three report files are written to
    #[arg(long, env = "TRAINREPORT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Fiscal year Y covers July 1 of Y-1 through June 30 of Y
    #[arg(long, env = "TRAINREPORT_FISCAL_YEAR")]
    fiscal_year: Option<i32>,

    /// Reference date for the expiration report (YYYY-MM-DD)
    #[arg(long, env = "TRAINREPORT_CHECK_DATE", value_parser = check_date_arg)]
    check_date: Option<NaiveDate>,

    /// Days after the check date that count as "expires soon"
    #[arg(long, env = "TRAINREPORT_HORIZON_DAYS")]
    horizon_days: Option<i64>,

    /// Training to include in the fiscal-year report (repeat three times)
    #[arg(long = "fiscal-training", value_name = "NAME")]
    fiscal_trainings: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Command-line and environment values win over the config file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(year) = self.fiscal_year {
            config.reports.fiscal_year = year;
        }
        if let Some(date) = self.check_date {
            config.reports.check_date = date;
        }
        if let Some(days) = self.horizon_days {
            config.reports.expiry_horizon_days = days;
        }
        if !self.fiscal_trainings.is_empty() {
            config.reports.fiscal_trainings = self.fiscal_trainings.clone();
        }
    }
}

fn check_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_check_date(raw).map_err(|e| e.to_string())
}

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must stay alive until exit so buffered file logs flush.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    if cli.write_config {
        return write_config(&cli, &config);
    }

    info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        fiscal_year = config.reports.fiscal_year,
        check_date = %config.reports.check_date,
        "trainreport starting"
    );

    let summary = trainreport_core::run(&config).context("Report run failed")?;

    eprintln!(
        "Reconciled {} completions into {} records ({} skipped).",
        summary.stats.entries_seen,
        summary.stats.records,
        summary.stats.skipped()
    );
    if summary.expiration_skipped > 0 {
        eprintln!(
            "  Warning: {} records had an unreadable expiration date",
            summary.expiration_skipped
        );
    }
    for path in &summary.written {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_config(cli: &Cli, config: &Config) -> Result<()> {
    config.validate().context("Refusing to save an invalid configuration")?;
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path().context("Could not find config directory")?,
    };
    config
        .save(&path)
        .with_context(|| format!("Failed to save config: {}", path.display()))?;
    eprintln!("Wrote configuration to {}", path.display());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
