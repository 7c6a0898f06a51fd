//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cradle_core::OutputFormat;

/// Cradle - Insights and predictions from infant care logs
#[derive(Parser)]
#[command(name = "cradle")]
#[command(about = "Caregiving insight and prediction engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the full insight report
    Insights {
        /// Event file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Lookback window in days (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,

        /// Reference instant, RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,

        /// Output format: text, json (defaults to config)
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Show descriptive statistics per category
    Stats {
        /// Event file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Lookback window in days (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,

        /// Reference instant, RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
    },

    /// Validate an event file and summarize its contents
    Check {
        /// Event file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,
    },
}
