//! Predictive models
//!
//! Each model is a plain function over one [`EventWindow`](crate::EventWindow)
//! partition (or its per-day aggregates). Nothing is trained ahead of time or
//! kept between calls. Every model has a minimum-sample gate; below it the
//! model returns `None` rather than fitting degenerate data.
//!
//! | Model | Gate |
//! |---|---|
//! | [`predict_next_feeding`] | 3 feedings |
//! | [`detect_feeding_anomalies`] | 10 feedings |
//! | [`classify_sleep_quality`] | 5 sleep sessions |
//! | [`predict_sleep_duration`] | 5 sessions with a duration |
//! | [`predict_feeding_amount`] | 10 feedings with a quantity |
//! | [`predict_diaper_change`] | 5 diaper changes |
//! | [`identify_routine_clusters`] | 20 events over 3 days |
//! | [`analyze_feeding_sleep_correlation`] | 5 feedings, 5 sleeps, 3 shared days |
//! | [`forecast_next_week`] | 14 events over 7 days |
//!
//! Randomized estimators use a fixed seed, so identical input gives identical
//! output.

pub mod anomaly;
pub mod correlation;
pub mod feeding_amount;
pub mod forecast;
pub mod intervals;
pub mod routine;
pub mod sleep;
pub mod tree;

pub use anomaly::{detect_feeding_anomalies, AnomalyReport, FeedingAnomaly};
pub use correlation::{
    analyze_feeding_sleep_correlation, CorrelationAnalysis, CorrelationDirection,
    CorrelationFinding, CorrelationPair, CorrelationStrength,
};
pub use feeding_amount::{predict_feeding_amount, FeedingAmountPrediction};
pub use forecast::{forecast_next_week, ForecastConfidence, Trend, WeeklyForecast};
pub use intervals::{
    predict_diaper_change, predict_next_feeding, DiaperChangePrediction, NextFeedingPrediction,
};
pub use routine::{identify_routine_clusters, RoutineAnalysis, RoutineCluster, RoutineType};
pub use sleep::{
    classify_sleep_quality, predict_sleep_duration, SleepDurationPrediction, SleepQuality,
    SleepQualityClassification,
};

/// Seed shared by every randomized estimator
pub const RANDOM_SEED: u64 = 42;

/// Log a missed minimum-sample gate
pub(crate) fn insufficient(model: &'static str, samples: usize, required: usize) {
    tracing::debug!(model, samples, required, "Insufficient data");
}
