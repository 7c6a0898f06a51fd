//! Sleep section

use super::descriptive::SleepSummary;
use super::engine::{AnalysisContext, Analyzer};
use super::types::{AnalyzerId, InsightReport, ItemKind, ReportItem};

/// Daily sleep below this is flagged
const LOW_SLEEP_HOURS: f64 = 10.0;

pub struct SleepAnalyzer;

impl Analyzer for SleepAnalyzer {
    fn id(&self) -> AnalyzerId {
        AnalyzerId::Sleep
    }

    fn name(&self) -> &'static str {
        "Sleep"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        let mut report = InsightReport::default();

        // Sessions without a duration say nothing about hours slept
        let Some(summary) = SleepSummary::from_window(ctx.window) else {
            return report;
        };
        if summary.with_duration == 0 {
            return report;
        }

        report.insights.push(
            ReportItem::new(
                "sleep:daily",
                ItemKind::Info,
                "Sleep",
                format!("Average of {:.1} hours/day", summary.hours_per_day),
            )
            .with_icon("bedtime"),
        );

        if summary.hours_per_day < LOW_SLEEP_HOURS {
            report.alerts.push(
                ReportItem::new(
                    "sleep:low",
                    ItemKind::Warning,
                    "Low sleep",
                    format!(
                        "Sleeping {:.1} hours/day, below the recommended {:.0}",
                        summary.hours_per_day, LOW_SLEEP_HOURS
                    ),
                )
                .with_icon("bedtime_off"),
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::test_utils::{at, sleep_at};
    use crate::window::EventWindow;

    fn analyze(events: &[Event]) -> InsightReport {
        let window = EventWindow::new(events, at("2026-01-15T00:00:00Z"), 2).unwrap();
        SleepAnalyzer.analyze(&AnalysisContext::new(&window))
    }

    #[test]
    fn test_no_sleep_no_items() {
        assert!(analyze(&[]).is_empty());
    }

    #[test]
    fn test_missing_durations_no_items() {
        let events = vec![
            sleep_at("2026-01-14T01:00:00Z", None),
            sleep_at("2026-01-14T13:00:00Z", None),
        ];
        assert!(analyze(&events).is_empty());
    }

    #[test]
    fn test_low_sleep_warning() {
        let events = vec![
            sleep_at("2026-01-13T20:00:00Z", Some(8.0)),
            sleep_at("2026-01-14T20:00:00Z", Some(4.0)),
        ];
        let report = analyze(&events);

        assert_eq!(report.insights[0].key, "sleep:daily");
        assert_eq!(report.insights[0].message, "Average of 6.0 hours/day");
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].key, "sleep:low");
        assert_eq!(report.alerts[0].kind, ItemKind::Warning);
    }

    #[test]
    fn test_enough_sleep_no_warning() {
        let events = vec![
            sleep_at("2026-01-13T01:00:00Z", Some(12.0)),
            sleep_at("2026-01-14T01:00:00Z", Some(12.0)),
        ];
        let report = analyze(&events);

        assert!(report.contains_key("sleep:daily"));
        assert!(report.alerts.is_empty());
    }
}
