//! Pattern detection and the recommendations built on it

use chrono::Timelike;
use std::collections::BTreeMap;

use crate::stats::{intervals_hours, mean, round_to};
use crate::window::EventWindow;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{AnalyzerId, BestSleepHour, InsightReport, ItemKind, Patterns, ReportItem};

pub struct PatternAnalyzer;

/// Start hour with the longest mean sleep
///
/// Sessions without a duration count as zero hours. Ties go to the earliest
/// hour.
pub fn best_sleep_hour(window: &EventWindow) -> Option<BestSleepHour> {
    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for event in window.sleeps() {
        by_hour
            .entry(event.timestamp.hour())
            .or_default()
            .push(event.duration_hours().unwrap_or(0.0));
    }

    let mut best: Option<(u32, f64)> = None;
    for (hour, durations) in &by_hour {
        let Some(avg) = mean(durations) else {
            continue;
        };
        if best.is_none_or(|(_, best_avg)| avg > best_avg) {
            best = Some((*hour, avg));
        }
    }

    best.map(|(hour, avg)| BestSleepHour {
        hour,
        avg_duration_hours: round_to(avg, 1),
    })
}

/// Mean hours between consecutive feedings, needs two feedings
pub fn avg_feeding_interval(window: &EventWindow) -> Option<f64> {
    mean(&intervals_hours(window.feedings())).map(|h| round_to(h, 1))
}

/// Detect every named pattern in the window
pub fn detect_patterns(window: &EventWindow) -> Patterns {
    Patterns {
        best_sleep_hour: best_sleep_hour(window),
        avg_feeding_interval_hours: avg_feeding_interval(window),
    }
}

fn recommendations(window: &EventWindow, patterns: &Patterns) -> Vec<ReportItem> {
    let mut items = Vec::new();

    if let Some(best) = &patterns.best_sleep_hour {
        items.push(
            ReportItem::new(
                "recommendation:sleep_time",
                ItemKind::Recommendation,
                "Best time for sleep",
                format!(
                    "Sleep starting around {:02}:00 lasts longest ({:.1}h on average). \
                     Try to start the main sleep near that hour.",
                    best.hour, best.avg_duration_hours
                ),
            )
            .with_icon("schedule"),
        );
    }

    if let Some(interval) = patterns.avg_feeding_interval_hours {
        items.push(
            ReportItem::new(
                "recommendation:feeding_interval",
                ItemKind::Recommendation,
                "Feeding rhythm",
                format!(
                    "Feedings happen about every {:.1} hours. Plan the next one around that interval.",
                    interval
                ),
            )
            .with_icon("restaurant"),
        );
    }

    if !window.sleeps().is_empty() {
        items.push(
            ReportItem::new(
                "recommendation:routine",
                ItemKind::Recommendation,
                "Consistent routine",
                "Keep bedtime and wake-up times consistent from day to day.",
            )
            .with_icon("lightbulb"),
        );
    }

    items
}

impl Analyzer for PatternAnalyzer {
    fn id(&self) -> AnalyzerId {
        AnalyzerId::Patterns
    }

    fn name(&self) -> &'static str {
        "Patterns"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        let patterns = detect_patterns(ctx.window);
        InsightReport {
            recommendations: recommendations(ctx.window, &patterns),
            patterns,
            ..InsightReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::test_utils::{at, feeding_at, sleep_at};

    fn window(events: &[Event]) -> EventWindow {
        EventWindow::new(events, at("2026-01-15T00:00:00Z"), 7).unwrap()
    }

    #[test]
    fn test_best_sleep_hour() {
        let events = vec![
            sleep_at("2026-01-12T13:00:00Z", Some(1.0)),
            sleep_at("2026-01-12T20:00:00Z", Some(6.0)),
            sleep_at("2026-01-13T20:30:00Z", Some(8.0)),
            sleep_at("2026-01-13T13:00:00Z", Some(2.0)),
        ];
        let best = best_sleep_hour(&window(&events)).unwrap();
        assert_eq!(best.hour, 20);
        assert_eq!(best.avg_duration_hours, 7.0);
    }

    #[test]
    fn test_best_sleep_hour_tie_goes_to_earliest() {
        let events = vec![
            sleep_at("2026-01-12T21:00:00Z", Some(3.0)),
            sleep_at("2026-01-12T09:00:00Z", Some(3.0)),
        ];
        assert_eq!(best_sleep_hour(&window(&events)).unwrap().hour, 9);
    }

    #[test]
    fn test_missing_duration_counts_as_zero() {
        let events = vec![
            sleep_at("2026-01-12T20:00:00Z", Some(6.0)),
            sleep_at("2026-01-13T20:00:00Z", None),
            sleep_at("2026-01-13T13:00:00Z", Some(4.0)),
        ];
        let best = best_sleep_hour(&window(&events)).unwrap();
        assert_eq!(best.hour, 13);
        assert_eq!(best.avg_duration_hours, 4.0);
    }

    #[test]
    fn test_feeding_interval_needs_two_feedings() {
        let one = vec![feeding_at("2026-01-14T08:00:00Z", None)];
        assert!(avg_feeding_interval(&window(&one)).is_none());

        let events = vec![
            feeding_at("2026-01-14T08:00:00Z", None),
            feeding_at("2026-01-14T10:30:00Z", None),
            feeding_at("2026-01-14T14:00:00Z", None),
        ];
        assert_eq!(avg_feeding_interval(&window(&events)), Some(3.0));
    }

    #[test]
    fn test_recommendation_order() {
        let events = vec![
            sleep_at("2026-01-13T20:00:00Z", Some(6.0)),
            feeding_at("2026-01-14T08:00:00Z", None),
            feeding_at("2026-01-14T11:00:00Z", None),
        ];
        let report = PatternAnalyzer.analyze(&AnalysisContext::new(&window(&events)));

        let keys: Vec<&str> = report.recommendations.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "recommendation:sleep_time",
                "recommendation:feeding_interval",
                "recommendation:routine",
            ]
        );
        assert!(report.recommendations[0].message.contains("20:00"));
        assert_eq!(report.patterns.avg_feeding_interval_hours, Some(3.0));
    }

    #[test]
    fn test_no_patterns_without_data() {
        let events = vec![feeding_at("2026-01-14T08:00:00Z", None)];
        let report = PatternAnalyzer.analyze(&AnalysisContext::new(&window(&events)));
        assert!(report.is_empty());
    }
}
