//! plugwatch - command-line frontend for broadcast device discovery.
//!
//! Runs one-shot discovery rounds or a continuous watch loop that drives
//! the discovery coordinator and renders consumer liveness.

mod cli;
mod commands;
mod consumer;
mod error;
mod output;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "plugwatch=debug,plugwatch_core=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Discover(args) => {
            commands::run_discover(args, cli.settings.as_deref(), cli.json).await
        }
        Commands::Watch(args) => {
            commands::run_watch(args, cli.settings.as_deref(), cli.json).await
        }
    }
}
