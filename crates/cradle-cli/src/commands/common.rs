//! Shared command utilities
//!
//! - `load_event_file` - Read and validate an event file
//! - `resolve_now` - Reference instant from `--now` or the configured clock
//! - `resolve_days` - Window length from `--days` or config

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use cradle_core::{load_events, EngineConfig, Event};

pub fn load_event_file(path: &Path) -> Result<Vec<Event>> {
    load_events(path).with_context(|| format!("Failed to load events from {}", path.display()))
}

/// Parse `--now` as RFC 3339, or take the current time in the configured offset
pub fn resolve_now(config: &EngineConfig, now: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match now {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .with_context(|| format!("Invalid --now timestamp (use RFC 3339): {}", ts)),
        None => config.now().context("Failed to determine current time"),
    }
}

pub fn resolve_days(config: &EngineConfig, days: Option<u32>) -> Result<u32> {
    let days = days.unwrap_or(config.window_days);
    if days == 0 {
        bail!("--days must be at least 1");
    }
    Ok(days)
}
