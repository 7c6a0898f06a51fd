//! Cradle CLI - Caregiving insight and prediction engine
//!
//! Usage:
//!   cradle insights --file events.json    Full insight report
//!   cradle stats --file events.csv        Descriptive statistics
//!   cradle check --file events.json       Validate an event file

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use cradle_core::EngineConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so report output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let config =
        EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Insights {
            file,
            days,
            now,
            format,
        } => commands::cmd_insights(&config, &file, days, now.as_deref(), format),
        Commands::Stats { file, days, now } => {
            commands::cmd_stats(&config, &file, days, now.as_deref())
        }
        Commands::Check { file } => commands::cmd_check(&file),
    }
}
