//! DCL conventions driver.
//!
//! Loads the resolution result the script interpreter recorded for one
//! script, groups its mutations by software type, and prints a summary.
//!
//! ```text
//! dcl check build.resolution.json
//!     -> DclConfig (--config | $DCL_CONFIG | ~/.dcl/config.toml)
//!     -> ResolutionResult (JSON)
//!     -> ConventionsResolutionProcessor::process
//!     -> summary on stdout | error chain on stderr, exit 1
//! ```

mod report;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dcl_config::{DEFAULT_LOG_FILTER, DclConfig};
use dcl_core::ConventionsResolutionProcessor;
use dcl_types::ResolutionResult;

#[derive(Parser)]
#[command(name = "dcl")]
#[command(about = "Group recorded DCL mutations by software type", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DCL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every recorded mutation and summarize conventions per software type
    Check {
        /// Resolution result recorded by the interpreter (JSON)
        input: PathBuf,

        /// List every grouped record under its software type
        #[arg(long)]
        list_records: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => DclConfig::load_from(path)?,
        None => DclConfig::load()?.unwrap_or_default(),
    };
    init_tracing(&config);

    match cli.command {
        Command::Check {
            input,
            list_records,
        } => check(&input, list_records || config.list_records()),
    }
}

fn check(input: &Path, list_records: bool) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let result: ResolutionResult = serde_json::from_str(&content)
        .with_context(|| format!("failed to load resolution result from {}", input.display()))?;

    let conventions = ConventionsResolutionProcessor::new()
        .process(&result)
        .with_context(|| format!("failed to resolve conventions in {}", input.display()))?;

    tracing::info!(
        input = %input.display(),
        software_types = conventions.software_types().count(),
        "Resolved conventions"
    );
    print!(
        "{}",
        report::render_summary(&conventions, result.provenance(), list_records)
    );
    Ok(())
}

fn init_tracing(config: &DclConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Some(path) = config.log_file() {
        match open_log_file(&path) {
            Ok(file) => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                    .with(env_filter)
                    .init();
                tracing::info!(path = %path.display(), "Logging initialized");
                return;
            }
            Err(err) => {
                eprintln!("warning: failed to open log file {}: {err}", path.display());
            }
        }
    }

    // Without a log file, stderr is reserved for the user-facing error line.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
