//! Passbook - personal finance ledger API

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{migrate, serve};

/// Passbook - personal finance ledger API
#[derive(Parser)]
#[command(name = "passbook", version, about, long_about = None)]
struct Cli {
    /// Data directory for the database and settings
    #[arg(long, env = "PASSBOOK_DIR", default_value = "passbook-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server (the default)
    Serve {
        /// Listen address (overrides settings.json)
        #[arg(long)]
        listen: Option<String>,
    },

    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve { listen: None }) {
        Commands::Serve { listen } => serve::run(&cli.data_dir, listen).await,
        Commands::Migrate => migrate::run(&cli.data_dir),
    }
}
