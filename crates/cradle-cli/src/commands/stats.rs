//! Descriptive statistics command

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use cradle_core::{DescriptiveStats, EngineConfig, EventWindow, OutputFormat};

use super::{load_event_file, resolve_days, resolve_now};

pub fn cmd_stats(
    config: &EngineConfig,
    file: &Path,
    days: Option<u32>,
    now: Option<&str>,
) -> Result<()> {
    let events = load_event_file(file)?;
    let now = resolve_now(config, now)?;
    let days = resolve_days(config, days)?;

    let window = EventWindow::new(&events, now, days).context("Failed to build event window")?;
    let stats = DescriptiveStats::from_window(&window);

    let output = match config.output {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")? + "\n"
        }
        OutputFormat::Text => render_stats(&stats)?,
    };
    print!("{}", output);

    Ok(())
}

pub fn render_stats(stats: &DescriptiveStats) -> Result<String> {
    let mut out = String::new();
    write_stats(&mut out, stats).context("Failed to format statistics")?;
    Ok(out)
}

fn write_stats(out: &mut String, stats: &DescriptiveStats) -> fmt::Result {
    writeln!(out)?;
    writeln!(
        out,
        "📊 Statistics (last {} days, {} events)",
        stats.days, stats.total_events
    )?;
    writeln!(out, "   ─────────────────────────────")?;

    match &stats.feeding {
        Some(f) => {
            writeln!(
                out,
                "   🍼 Feeding: {} ({:.1}/day)",
                f.count, f.daily_average
            )?;
            if f.with_quantity > 0 {
                writeln!(
                    out,
                    "      {:.0} ml total, {:.0} ml/day ({} with amount)",
                    f.total_ml, f.ml_per_day, f.with_quantity
                )?;
            }
            if let Some(interval) = &f.interval {
                writeln!(
                    out,
                    "      Interval: {:.1}h ± {:.1}h",
                    interval.mean_hours, interval.std_hours
                )?;
            }
            writeln!(out, "      Last: {:.1}h ago", f.hours_since_last)?;
        }
        None => {
            writeln!(out, "   🍼 Feeding: none")?;
        }
    }

    match &stats.sleep {
        Some(s) => {
            writeln!(out, "   😴 Sleep: {} ({:.1}/day)", s.count, s.daily_average)?;
            if let Some(avg) = s.avg_session_hours {
                writeln!(
                    out,
                    "      {:.1}h total, {:.1}h/day, {:.1}h per session",
                    s.total_hours, s.hours_per_day, avg
                )?;
            }
        }
        None => {
            writeln!(out, "   😴 Sleep: none")?;
        }
    }

    match &stats.diaper {
        Some(d) => {
            writeln!(out, "   🧷 Diaper: {} ({:.1}/day)", d.count, d.daily_average)?;
            if d.has_kinds() {
                writeln!(
                    out,
                    "      {} wet, {} dirty, {} both, {} unspecified",
                    d.wet, d.dirty, d.both, d.unspecified
                )?;
            }
        }
        None => {
            writeln!(out, "   🧷 Diaper: none")?;
        }
    }

    match &stats.health {
        Some(h) => {
            writeln!(out, "   🩺 Health: {} ({:.1}/day)", h.count, h.daily_average)?;
            if let Some(t) = h.latest_temperature {
                writeln!(out, "      Latest temperature: {:.1} °C", t)?;
            }
            if let Some(w) = h.latest_weight {
                writeln!(out, "      Latest weight: {:.2} kg", w)?;
            }
            if !h.medications.is_empty() {
                writeln!(out, "      Medications: {}", h.medications.join(", "))?;
            }
        }
        None => {
            writeln!(out, "   🩺 Health: none")?;
        }
    }

    writeln!(out)
}
