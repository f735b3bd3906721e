//! Gridwatch
//!
//! Polls a Google Sheets range, and whenever the tracked columns change,
//! re-renders every row through the configured line template and replaces
//! the output file.
//!
//! Usage:
//!     gridwatch --config config.json --credentials credentials.json
//!
//! Every failure is fatal: the process logs which step failed and exits so
//! an external supervisor can restart it.

use anyhow::{Context, Result};
use clap::Parser;
use gridwatch_core::{CycleOutcome, PollScheduler, WatchConfig};
use gridwatch_sheets::{Authenticator, SheetsClient};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "gridwatch",
    about = "Mirror tracked spreadsheet columns into a rendered text file"
)]
struct Args {
    /// Path to the JSON watch configuration
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Path to the Google OAuth client credentials
    #[arg(long, default_value = "credentials.json")]
    credentials: PathBuf,

    /// Path to the cached OAuth token
    #[arg(long, default_value = "token.json")]
    token_cache: PathBuf,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = gridwatch_logging::init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    info!("Starting gridwatch");
    info!("  Config: {}", args.config.display());
    info!("  Credentials: {}", args.credentials.display());
    info!("  Token cache: {}", args.token_cache.display());

    let config = WatchConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    info!("  Sheet: {} range {}", config.sheet.id, config.range());
    info!("  Output: {}", config.file.location.display());
    info!("  Interval: {}s", config.sheet.refresh_interval);

    let auth = Authenticator::from_files(&args.credentials, &args.token_cache)
        .context("Failed to load Google credentials")?;
    let client = SheetsClient::new(auth, config.sheet.id.clone(), config.range());

    let mut scheduler =
        PollScheduler::new(&config, client).context("Failed to build poll scheduler")?;

    if args.once {
        let outcome = scheduler.run_cycle().await.context("Poll cycle failed")?;
        match outcome {
            CycleOutcome::Published { rows } => info!(rows, "Published one cycle, exiting"),
            CycleOutcome::Unchanged => info!("No change detected, exiting"),
        }
        return Ok(());
    }

    scheduler.run().await.context("Poll loop aborted")?;
    Ok(())
}
