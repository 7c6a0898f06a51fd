//! Model-backed insights
//!
//! Runs every predictive model over the window and turns each present result
//! into one [`MlInsight`]. A model below its sample gate contributes nothing.

use crate::predict::{
    analyze_feeding_sleep_correlation, classify_sleep_quality, detect_feeding_anomalies,
    forecast_next_week, identify_routine_clusters, predict_diaper_change, predict_feeding_amount,
    predict_next_feeding, predict_sleep_duration,
};

use super::engine::{AnalysisContext, Analyzer};
use super::types::{AnalyzerId, InsightReport, ItemKind, MlData, MlInsight};

/// Minutes before a predicted diaper change worth mentioning
const DIAPER_SOON_MINUTES: f64 = 60.0;

pub struct PredictionAnalyzer;

impl Analyzer for PredictionAnalyzer {
    fn id(&self) -> AnalyzerId {
        AnalyzerId::Predictions
    }

    fn name(&self) -> &'static str {
        "Predictions"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        let window = ctx.window;
        let now = ctx.now();
        let mut items = Vec::new();

        if let Some(p) = predict_next_feeding(window.feedings(), now) {
            if p.is_overdue {
                items.push(
                    MlInsight::new(
                        ItemKind::MlAlert,
                        "Feeding overdue",
                        format!(
                            "{:.1} hours since the last feeding, usual interval is {:.1} hours",
                            p.hours_since_last, p.avg_interval_hours
                        ),
                        MlData::NextFeeding(p),
                    )
                    .with_icon("alarm"),
                );
            } else if p.hours_until_next > 0.0 {
                items.push(
                    MlInsight::new(
                        ItemKind::MlInfo,
                        "Next feeding",
                        format!(
                            "Next feeding expected in {:.1} hours at {} ({:.0}% confidence)",
                            p.hours_until_next,
                            p.predicted_time.format("%H:%M"),
                            p.confidence
                        ),
                        MlData::NextFeeding(p),
                    )
                    .with_icon("schedule"),
                );
            }
        }

        if let Some(report) = detect_feeding_anomalies(window.feedings()) {
            if report.anomalies_detected > 0 {
                items.push(MlInsight::new(
                    ItemKind::MlWarning,
                    "Unusual feedings",
                    format!(
                        "{} unusual feedings detected ({:.1}% of {})",
                        report.anomalies_detected, report.anomaly_rate, report.total_feedings
                    ),
                    MlData::FeedingAnomalies(report),
                ));
            }
        }

        if let Some(c) = classify_sleep_quality(window.sleeps()) {
            items.push(
                MlInsight::new(
                    ItemKind::MlClassification,
                    "Sleep quality",
                    format!(
                        "{} ({}/100): {:.1} hours/day. {}",
                        c.quality.label(),
                        c.score,
                        c.sleep_per_day_hours,
                        c.recommendation
                    ),
                    MlData::SleepQuality(c),
                )
                .with_icon("bedtime"),
            );
        }

        if let Some(p) = predict_sleep_duration(window.sleeps(), now) {
            items.push(
                MlInsight::new(
                    ItemKind::MlPrediction,
                    "Sleep duration",
                    format!(
                        "Sleep starting at {:02}:00 is likely to last {:.1} hours ({:.0}% confidence)",
                        p.current_hour, p.predicted_duration_hours, p.confidence
                    ),
                    MlData::SleepDuration(p),
                )
                .with_icon("bedtime"),
            );
        }

        if let Some(p) = predict_feeding_amount(window.feedings(), now) {
            items.push(
                MlInsight::new(
                    ItemKind::MlPrediction,
                    "Feeding amount",
                    format!(
                        "Suggested amount for the next feeding: {:.0} ml (average {:.0} ml)",
                        p.predicted_amount_ml, p.avg_amount_ml
                    ),
                    MlData::FeedingAmount(p),
                )
                .with_icon("restaurant"),
            );
        }

        if let Some(r) = identify_routine_clusters(window) {
            items.push(MlInsight::new(
                ItemKind::MlClassification,
                "Daily routine",
                format!(
                    "Today looks like one of the {} ({} days analyzed)",
                    r.current_routine.label(),
                    r.total_days_analyzed
                ),
                MlData::RoutineClusters(r),
            ));
        }

        if let Some(c) = analyze_feeding_sleep_correlation(window) {
            items.push(MlInsight::new(
                ItemKind::MlInfo,
                "Feeding and sleep",
                c.summary(),
                MlData::Correlation(c),
            ));
        }

        if let Some(p) = predict_diaper_change(window.diapers(), now) {
            if p.is_overdue {
                items.push(
                    MlInsight::new(
                        ItemKind::MlAlert,
                        "Diaper change due",
                        format!(
                            "{:.1} hours since the last change ({:.0}% likely due)",
                            p.hours_since_last, p.probability
                        ),
                        MlData::DiaperChange(p),
                    )
                    .with_icon("baby_changing_station"),
                );
            } else if p.minutes_until_next <= DIAPER_SOON_MINUTES {
                items.push(
                    MlInsight::new(
                        ItemKind::MlInfo,
                        "Diaper change soon",
                        format!(
                            "Next change expected in about {:.0} minutes",
                            p.minutes_until_next
                        ),
                        MlData::DiaperChange(p),
                    )
                    .with_icon("baby_changing_station"),
                );
            }
        }

        if let Some(f) = forecast_next_week(window) {
            items.push(
                MlInsight::new(
                    ItemKind::MlPrediction,
                    "Next week",
                    format!(
                        "Expect about {:.1} feedings, {:.1} hours of sleep and {:.1} changes per day \
                         (feeding {}, {} confidence)",
                        f.feeding_per_day,
                        f.sleep_hours_per_day,
                        f.diaper_per_day,
                        f.feeding_trend.as_str(),
                        f.confidence.as_str()
                    ),
                    MlData::Forecast(f),
                )
                .with_icon("calendar_month"),
            );
        }

        InsightReport {
            ml_insights: items,
            ..InsightReport::default()
        }
    }
}
