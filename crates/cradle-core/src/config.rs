//! Engine configuration
//!
//! Resolution order: an explicit path, then the user override at
//! `<data_local_dir>/cradle/config.toml`, then the embedded default.
//! Only the defaults for the outer surface live here; alert and model
//! thresholds are fixed.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/cradle.toml");

const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// How the CLI renders a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lookback window in days
    pub window_days: u32,
    /// Offset from UTC used for the current instant
    pub utc_offset_minutes: i32,
    pub output: OutputFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 14,
            utc_offset_minutes: 0,
            output: OutputFormat::Text,
        }
    }
}

impl EngineConfig {
    /// Resolve configuration from an explicit path or the default locations
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_config(path)
    }

    /// Parse TOML content, applying it over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// Current instant in the configured offset
    pub fn now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(Utc::now().with_timezone(&self.offset()?))
    }
}

/// User override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("cradle").join("config.toml"))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => {
                tracing::debug!(path = %default_path.display(), "Using config override");
                fs::read_to_string(&default_path)?
            }
            _ => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    window: Option<RawWindow>,
    clock: Option<RawClock>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawClock {
    utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    format: Option<String>,
}

fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = EngineConfig::default();

    if let Some(days) = raw.window.and_then(|w| w.days) {
        if days == 0 {
            return Err(Error::Config("window.days must be at least 1".to_string()));
        }
        config.window_days = days;
    }

    if let Some(offset) = raw.clock.and_then(|c| c.utc_offset_minutes) {
        if offset.abs() >= MAX_OFFSET_MINUTES {
            return Err(Error::Config(format!(
                "clock.utc_offset_minutes must be within ±{}: {}",
                MAX_OFFSET_MINUTES, offset
            )));
        }
        config.utc_offset_minutes = offset;
    }

    if let Some(format) = raw.output.and_then(|o| o.format) {
        config.output = format.parse().map_err(Error::Config)?;
    }

    Ok(config)
}
