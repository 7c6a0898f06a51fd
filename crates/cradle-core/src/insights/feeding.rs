//! Feeding section: daily rate, overdue alert and half-window trend

use crate::window::EventWindow;

use super::descriptive::FeedingSummary;
use super::engine::{AnalysisContext, Analyzer};
use super::types::{AnalyzerId, InsightReport, ItemKind, ReportItem};

/// Hours without a feeding before the overdue alert fires
const OVERDUE_HOURS: f64 = 4.0;
/// Percent change between window halves reported as a trend
const TREND_THRESHOLD_PERCENT: f64 = 20.0;

pub struct FeedingAnalyzer;

/// Percent change in feeding count from the older to the recent half
///
/// `None` when either half has no feedings.
fn half_window_change(window: &EventWindow) -> Option<f64> {
    let midpoint = window.midpoint();

    let (recent, older): (Vec<_>, Vec<_>) = window
        .feedings()
        .iter()
        .partition(|e| e.timestamp >= midpoint);

    if recent.is_empty() || older.is_empty() {
        return None;
    }

    let older_count = older.len() as f64;
    Some((recent.len() as f64 - older_count) / older_count * 100.0)
}

impl Analyzer for FeedingAnalyzer {
    fn id(&self) -> AnalyzerId {
        AnalyzerId::Feeding
    }

    fn name(&self) -> &'static str {
        "Feeding"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        let mut report = InsightReport::default();

        let Some(summary) = FeedingSummary::from_window(ctx.window) else {
            report.alerts.push(
                ReportItem::new(
                    "feeding:none",
                    ItemKind::Warning,
                    "No feeding records",
                    format!("No feedings recorded in the last {} days", ctx.window.days()),
                )
                .with_icon("no_food"),
            );
            return report;
        };

        if summary.total_ml > 0.0 {
            report.insights.push(
                ReportItem::new(
                    "feeding:daily",
                    ItemKind::Info,
                    "Feeding",
                    format!(
                        "Average of {:.1} feedings/day ({:.0} ml/day)",
                        summary.daily_average, summary.ml_per_day
                    ),
                )
                .with_icon("restaurant"),
            );
        }

        if summary.hours_since_last > OVERDUE_HOURS {
            report.alerts.push(
                ReportItem::new(
                    "feeding:overdue",
                    ItemKind::Urgent,
                    "Time since last feeding",
                    format!("{:.1} hours since the last feeding", summary.hours_since_last),
                )
                .with_icon("alarm"),
            );
        }

        if let Some(change) = half_window_change(ctx.window) {
            if change.abs() > TREND_THRESHOLD_PERCENT {
                let (direction, icon) = if change > 0.0 {
                    ("increased", "trending_up")
                } else {
                    ("decreased", "trending_down")
                };
                report.insights.push(
                    ReportItem::new(
                        "feeding:trend",
                        ItemKind::Trend,
                        "Feeding trend",
                        format!(
                            "Feeding frequency {} by {:.0}% in the recent half of the period",
                            direction,
                            change.abs()
                        ),
                    )
                    .with_icon(icon),
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::test_utils::{at, feeding_at, feedings_every, sleep_at};

    fn analyze(events: &[Event], days: u32) -> InsightReport {
        let window = EventWindow::new(events, at("2026-01-15T00:00:00Z"), days).unwrap();
        FeedingAnalyzer.analyze(&AnalysisContext::new(&window))
    }

    #[test]
    fn test_no_feedings_warns() {
        let report = analyze(&[sleep_at("2026-01-14T20:00:00Z", Some(2.0))], 7);

        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].key, "feeding:none");
        assert_eq!(report.alerts[0].kind, ItemKind::Warning);
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_daily_info_requires_quantity() {
        let events = vec![
            feeding_at("2026-01-14T21:00:00Z", None),
            feeding_at("2026-01-14T23:00:00Z", None),
        ];
        let report = analyze(&events, 1);
        assert!(!report.contains_key("feeding:daily"));

        let events = vec![
            feeding_at("2026-01-14T21:00:00Z", Some(120.0)),
            feeding_at("2026-01-14T23:00:00Z", Some(100.0)),
        ];
        let report = analyze(&events, 1);
        let daily = &report.insights[0];
        assert_eq!(daily.key, "feeding:daily");
        assert_eq!(daily.message, "Average of 2.0 feedings/day (220 ml/day)");
    }

    #[test]
    fn test_overdue_alert() {
        let report = analyze(&[feeding_at("2026-01-14T19:00:00Z", None)], 1);
        assert!(report.contains_key("feeding:overdue"));
        assert_eq!(report.alerts[0].kind, ItemKind::Urgent);

        // Exactly four hours is not overdue
        let report = analyze(&[feeding_at("2026-01-14T20:00:00Z", None)], 1);
        assert!(!report.contains_key("feeding:overdue"));
    }

    #[test]
    fn test_trend_increasing() {
        // Older half (Jan 8-11): 4 feedings, recent half: 8
        let mut events = feedings_every(at("2026-01-09T00:00:00Z"), 12.0, 4, None);
        events.extend(feedings_every(at("2026-01-12T00:00:00Z"), 8.0, 8, None));

        let report = analyze(&events, 7);
        let trend = report
            .insights
            .iter()
            .find(|i| i.key == "feeding:trend")
            .unwrap();
        assert_eq!(trend.kind, ItemKind::Trend);
        assert_eq!(trend.icon, "trending_up");
        assert!(trend.message.contains("increased by 100%"));
    }

    #[test]
    fn test_trend_needs_both_halves() {
        let events = feedings_every(at("2026-01-13T00:00:00Z"), 3.0, 8, None);
        let report = analyze(&events, 7);
        assert!(!report.contains_key("feeding:trend"));
    }

    #[test]
    fn test_small_change_is_not_a_trend() {
        let mut events = feedings_every(at("2026-01-08T12:00:00Z"), 6.0, 10, None);
        events.extend(feedings_every(at("2026-01-12T00:00:00Z"), 6.0, 11, None));

        let report = analyze(&events, 7);
        assert!(!report.contains_key("feeding:trend"));
    }

    #[test]
    fn test_trend_over_unbounded_window() {
        let mut events = vec![feeding_at("1970-01-01T00:00:00Z", None)];
        events.extend(feedings_every(at("2026-01-13T00:00:00Z"), 3.0, 8, None));

        // The midpoint falls far before 1970, so every feeding is recent
        let report = analyze(&events, u32::MAX);
        assert!(!report.contains_key("feeding:trend"));
    }
}
