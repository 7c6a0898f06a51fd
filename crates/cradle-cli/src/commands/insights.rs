//! Insight report command

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use cradle_core::{compute_insights, EngineConfig, InsightReport, OutputFormat, ReportItem};

use super::{load_event_file, resolve_days, resolve_now};

pub fn cmd_insights(
    config: &EngineConfig,
    file: &Path,
    days: Option<u32>,
    now: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let events = load_event_file(file)?;
    let now = resolve_now(config, now)?;
    let days = resolve_days(config, days)?;

    let report = compute_insights(&events, now, days).context("Failed to compute insights")?;
    let output = render_report(&report, format.unwrap_or(config.output), now, days)?;
    print!("{}", output);

    Ok(())
}

/// Render a report as text sections or pretty JSON
pub fn render_report(
    report: &InsightReport,
    format: OutputFormat,
    now: DateTime<FixedOffset>,
    days: u32,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            write_text(&mut out, report, now, days).context("Failed to format report")?;
            Ok(out)
        }
    }
}

fn write_items(out: &mut String, header: &str, items: &[ReportItem]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{} ({})", header, items.len())?;
    for item in items {
        writeln!(out, "   • {}: {}", item.title, item.message)?;
    }
    Ok(())
}

fn write_text(
    out: &mut String,
    report: &InsightReport,
    now: DateTime<FixedOffset>,
    days: u32,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(
        out,
        "🍼 Cradle Insights (last {} days, as of {})",
        days,
        now.format("%Y-%m-%d %H:%M %:z")
    )?;
    writeln!(
        out,
        "   ─────────────────────────────────────────────────────────────"
    )?;

    if report.is_empty() {
        writeln!(out, "   No events in this window.")?;
        return writeln!(out);
    }

    write_items(out, "📋 Insights", &report.insights)?;
    write_items(out, "⚠️  Alerts", &report.alerts)?;

    if !report.patterns.is_empty() {
        writeln!(out)?;
        writeln!(out, "🔎 Patterns")?;
        if let Some(best) = &report.patterns.best_sleep_hour {
            writeln!(
                out,
                "   Best sleep hour: {:02}:00 ({:.1}h average)",
                best.hour, best.avg_duration_hours
            )?;
        }
        if let Some(interval) = report.patterns.avg_feeding_interval_hours {
            writeln!(out, "   Feeding interval: {:.1}h average", interval)?;
        }
    }

    write_items(out, "💡 Recommendations", &report.recommendations)?;

    if !report.ml_insights.is_empty() {
        writeln!(out)?;
        writeln!(out, "🤖 Model insights ({})", report.ml_insights.len())?;
        for insight in &report.ml_insights {
            writeln!(
                out,
                "   • [{}] {}: {}",
                insight.kind, insight.title, insight.message
            )?;
        }
    }

    writeln!(out)
}
