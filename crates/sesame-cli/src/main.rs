//! sesame - CLI for exploring a sesame-backed auth service.
//!
//! This is a thin wrapper over the `sesame` library, intended for manual
//! exploration and debugging against a hosted auth + data service.

mod cli;
mod commands;
mod output;
mod session;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Login(args) => commands::login::run(args).await,
        Commands::Whoami(args) => commands::whoami::run(args).await,
        Commands::Profile(args) => commands::profile::run(args).await,
        Commands::SignOut(args) => commands::sign_out::run(args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
