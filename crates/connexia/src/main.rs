mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connexia_core::convert::parse_timestamp;
use connexia_core::{DataStore, Dataset, DatasetFormat, Snapshot, fixtures};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::Context;
use crate::config::Settings;
use crate::error::CliError;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a dataset
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            commands::completions::handle(args.shell);
            Ok(())
        }

        // All other commands work on a snapshot
        cmd => {
            let cfg = config::load(&cli.global)?;
            let settings = config::resolve(&cli.global, &cfg)?;
            let ctx = build_context(&cli.global, settings)?;

            tracing::debug!(command = ?cmd, now = %ctx.now, "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global)
        }
    }
}

/// Load the dataset, capture a snapshot, and pin `now` for this run.
fn build_context(global: &GlobalOpts, settings: Settings) -> Result<Context, CliError> {
    let now = match global.now.as_deref() {
        Some(raw) => parse_timestamp("--now", raw)?,
        None => Utc::now(),
    };

    let store = match settings.data.as_deref() {
        Some(path) => load_store(path)?,
        None => {
            tracing::info!("no dataset configured, using the built-in sample");
            DataStore::from_dataset(fixtures::sample_dataset(now))?
        }
    };
    let snapshot = Snapshot::capture(&store)?;

    Ok(Context {
        snapshot,
        now,
        settings,
    })
}

/// Read, parse, and index a dataset file. Every failure is reported
/// against the file.
fn load_store(path: &Path) -> Result<DataStore, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::DatasetUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    DatasetFormat::from_path(path)
        .and_then(|format| Dataset::parse(&text, format))
        .and_then(DataStore::from_dataset)
        .map_err(|e| CliError::dataset(path, e))
}
