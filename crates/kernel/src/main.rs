//! Formsmith CLI
//!
//! Sanitize field schemas, compile masks, check values and export
//! submissions from JSON files.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use formsmith_kernel::Config;

use crate::cli::Cli;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_filter);
    debug!(command = ?args.command, "starting");

    cli::run(args, config)
}

/// Initialize tracing on stderr, keeping stdout for command output.
fn init_tracing(fallback: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
