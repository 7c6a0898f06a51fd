//! CLI command tests

use std::io::Write;
use std::path::Path;

use clap::Parser;
use cradle_core::{compute_insights, EngineConfig, InsightReport, OutputFormat};
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands};
use crate::commands;

const EVENTS_JSON: &str = r#"[
    {"category": "feeding", "timestamp": "2026-01-14T08:00:00Z", "payload": {"quantity_ml": 120}},
    {"category": "feeding", "timestamp": "2026-01-14T11:00:00Z", "payload": {"quantity_ml": 130}},
    {"category": "feeding", "timestamp": "2026-01-14T14:00:00Z", "payload": {"quantity_ml": 110}},
    {"category": "sleep", "timestamp": "2026-01-14T12:00:00Z", "payload": {"duration_hours": 2.5}},
    {"category": "diaper", "timestamp": "2026-01-14T12:30:00Z", "payload": {"kind": "wet"}},
    {"category": "health", "timestamp": "2026-01-14T13:00:00Z", "payload": {"temperature": 37.2}}
]"#;

const EVENTS_CSV: &str = "\
category,timestamp,quantity_ml,feeding_type,duration_hours,kind,temperature,weight,medication,dosage,note
feeding,2026-01-14T08:00:00Z,120,bottle,,,,,,,
sleep,2026-01-14T12:00:00Z,,,2.5,,,,,,nap
diaper,2026-01-14T12:30:00Z,,,,dirty,,,,,
";

const NOW: &str = "2026-01-14T16:00:00Z";

fn event_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn sample_report() -> InsightReport {
    let file = event_file(EVENTS_JSON, ".json");
    let events = commands::load_event_file(file.path()).unwrap();
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    compute_insights(&events, now, 1).unwrap()
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_insights_args() {
    let cli = Cli::try_parse_from([
        "cradle", "-v", "insights", "--file", "events.json", "--days", "7", "--format", "json",
    ])
    .unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Insights {
            file, days, format, ..
        } => {
            assert_eq!(file, Path::new("events.json"));
            assert_eq!(days, Some(7));
            assert_eq!(format, Some(OutputFormat::Json));
        }
        _ => panic!("expected insights command"),
    }
}

#[test]
fn test_parse_rejects_unknown_format() {
    let result = Cli::try_parse_from(["cradle", "insights", "--file", "e.json", "--format", "xml"]);
    assert!(result.is_err());
}

// ========== Shared Utility Tests ==========

#[test]
fn test_resolve_now() {
    let config = EngineConfig::default();
    let now = commands::resolve_now(&config, Some("2026-01-14T16:00:00+02:00")).unwrap();
    assert_eq!(now.offset().local_minus_utc(), 7200);

    assert!(commands::resolve_now(&config, Some("yesterday")).is_err());
    assert!(commands::resolve_now(&config, None).is_ok());
}

#[test]
fn test_resolve_days() {
    let config = EngineConfig::default();
    assert_eq!(commands::resolve_days(&config, None).unwrap(), 14);
    assert_eq!(commands::resolve_days(&config, Some(3)).unwrap(), 3);
    assert!(commands::resolve_days(&config, Some(0)).is_err());
}

#[test]
fn test_load_event_file_formats() {
    let json = event_file(EVENTS_JSON, ".json");
    assert_eq!(commands::load_event_file(json.path()).unwrap().len(), 6);

    let csv = event_file(EVENTS_CSV, ".csv");
    assert_eq!(commands::load_event_file(csv.path()).unwrap().len(), 3);

    let txt = event_file(EVENTS_JSON, ".txt");
    assert!(commands::load_event_file(txt.path()).is_err());

    assert!(commands::load_event_file(Path::new("/nonexistent/events.json")).is_err());
}

// ========== Insights Command Tests ==========

#[test]
fn test_render_report_text() {
    let report = sample_report();
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    let text = commands::render_report(&report, OutputFormat::Text, now, 1).unwrap();

    assert!(text.contains("Cradle Insights (last 1 days"));
    assert!(text.contains("📋 Insights"));
    assert!(text.contains("⚠️  Alerts"));
    assert!(text.contains("Low sleep"));
    assert!(text.contains("💡 Recommendations (3)"));
}

#[test]
fn test_render_report_json_round_trips() {
    let report = sample_report();
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    let json = commands::render_report(&report, OutputFormat::Json, now, 1).unwrap();

    let parsed: InsightReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_render_report_json_is_the_whole_output() {
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    for report in [sample_report(), InsightReport::default()] {
        let json = commands::render_report(&report, OutputFormat::Json, now, 1).unwrap();

        assert!(json.starts_with('{'));
        assert!(json.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
    }
}

#[test]
fn test_render_empty_report() {
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    let text =
        commands::render_report(&InsightReport::default(), OutputFormat::Text, now, 7).unwrap();
    assert!(text.contains("No events in this window."));
}

#[test]
fn test_cmd_insights() {
    let file = event_file(EVENTS_JSON, ".json");
    let config = EngineConfig::default();

    let result = commands::cmd_insights(&config, file.path(), Some(2), Some(NOW), None);
    assert!(result.is_ok());

    let result = commands::cmd_insights(
        &config,
        file.path(),
        None,
        Some(NOW),
        Some(OutputFormat::Json),
    );
    assert!(result.is_ok());

    let result = commands::cmd_insights(&config, file.path(), Some(0), Some(NOW), None);
    assert!(result.is_err());
}

// ========== Stats and Check Command Tests ==========

#[test]
fn test_cmd_stats() {
    let file = event_file(EVENTS_CSV, ".csv");
    let result = commands::cmd_stats(&EngineConfig::default(), file.path(), Some(1), Some(NOW));
    assert!(result.is_ok());
}

#[test]
fn test_render_stats() {
    let file = event_file(EVENTS_JSON, ".json");
    let events = commands::load_event_file(file.path()).unwrap();
    let now = commands::resolve_now(&EngineConfig::default(), Some(NOW)).unwrap();
    let window = cradle_core::EventWindow::new(&events, now, 1).unwrap();
    let text = commands::render_stats(&cradle_core::DescriptiveStats::from_window(&window)).unwrap();

    assert!(text.contains("🍼 Feeding: 3 (3.0/day)"));
    assert!(text.contains("360 ml total"));
    assert!(text.contains("Interval: 3.0h ± 0.0h"));
    assert!(text.contains("1 wet, 0 dirty, 0 both, 0 unspecified"));
    assert!(text.contains("Latest temperature: 37.2 °C"));
}

#[test]
fn test_render_check() {
    let file = event_file(EVENTS_JSON, ".json");
    let events = commands::load_event_file(file.path()).unwrap();
    let text = commands::render_check(file.path(), &events).unwrap();

    assert!(text.contains("Events: 6"));
    assert!(text.contains("feeding  3"));
    assert!(text.contains("health   1"));
    assert!(text.contains("2026-01-14T08:00:00+00:00"));
}

#[test]
fn test_cmd_check_rejects_invalid_payload() {
    let file = event_file(
        r#"[{"category": "feeding", "timestamp": "2026-01-14T08:00:00Z", "payload": {"quantity_ml": -5}}]"#,
        ".json",
    );
    assert!(commands::cmd_check(file.path()).is_err());
}
