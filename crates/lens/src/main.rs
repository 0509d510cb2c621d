//! Lens - compile analytics requests into BigQuery SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile a request document
//! lens compile request.json --project my-project --dataset analytics_123
//!
//! # Read the request from stdin, override its date range
//! cat request.json | lens compile --range 30d
//!
//! # List supported metrics
//! lens metrics
//! ```

mod cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lens_config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default config locations, tried in order when `--config` is not given
const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/config.toml", "lens.toml"];

/// Lens - compile analytics requests into BigQuery SQL
#[derive(Parser, Debug)]
#[command(name = "lens")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a request document into SQL
    Compile(cmd::compile::CompileArgs),

    /// List the metrics the compiler understands
    Metrics(cmd::metrics::MetricsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let log_level = cli
        .log_level
        .unwrap_or_else(|| config.log.level.as_str().to_string());
    init_logging(&log_level, config.log.format)?;

    match cli.command {
        Command::Compile(args) => cmd::compile::run(args, &config),
        Command::Metrics(args) => cmd::metrics::run(args),
    }
}

/// Load config from an explicit path, a default location, or defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    for candidate in DEFAULT_CONFIG_PATHS {
        let candidate = Path::new(candidate);
        if candidate.exists() {
            return Config::from_file(candidate)
                .with_context(|| format!("failed to load config {}", candidate.display()));
        }
    }

    Ok(Config::default())
}

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr so stdout carries only SQL.
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
