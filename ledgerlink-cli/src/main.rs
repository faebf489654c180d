//! Ledgerlink CLI - reconcile feed exports into your ledger

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, status, sync};

/// Ledgerlink - import feed transactions without double-counting
#[derive(Parser)]
#[command(name = "llk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ledger status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the feed, classify it against the ledger and apply
    Sync {
        /// Feed provider (optional, uses the configured default)
        provider: Option<String>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage feed-to-ledger account mappings
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountCommands,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Sync {
            provider,
            dry_run,
            json,
        } => sync::run(provider, dry_run, json),
        Commands::Accounts { command } => accounts::run(command),
    }
}
