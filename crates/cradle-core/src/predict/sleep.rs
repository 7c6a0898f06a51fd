//! Sleep quality tiering and sleep duration regression

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::stats::{clamp_percent, linear_regression, mean, round_to};

use super::insufficient;

pub const MIN_SLEEPS: usize = 5;

/// Ordinal sleep quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl SleepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs_improvement",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs improvement",
        }
    }

    /// Fixed score attached to each tier
    pub fn score(&self) -> u8 {
        match self {
            Self::Excellent => 95,
            Self::Good => 80,
            Self::Fair => 60,
            Self::NeedsImprovement => 40,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Excellent => "Great work! Keep this sleep routine consistent.",
            Self::Good => "Very good. Keep bedtimes consistent to improve further.",
            Self::Fair => "Consider a stricter sleep routine and a calmer sleep environment.",
            Self::NeedsImprovement => {
                "Talk to your pediatrician. Set fixed sleep times and review the sleep environment."
            }
        }
    }

    /// Tier for a daily total and a mean session length, in hours
    pub fn classify(sleep_per_day: f64, avg_session: f64) -> Self {
        if sleep_per_day >= 12.0 && avg_session >= 2.0 {
            Self::Excellent
        } else if sleep_per_day >= 10.0 && avg_session >= 1.5 {
            Self::Good
        } else if sleep_per_day >= 8.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityClassification {
    pub quality: SleepQuality,
    pub score: u8,
    pub avg_duration_hours: f64,
    pub sleep_per_day_hours: f64,
    pub total_sleep_sessions: usize,
    pub recommendation: String,
}

/// Classify sleep quality over the calendar span covered by the sessions
///
/// The span counts whole days between the first and last session, plus one.
pub fn classify_sleep_quality(sleeps: &[Event]) -> Option<SleepQualityClassification> {
    if sleeps.len() < MIN_SLEEPS {
        insufficient("sleep_quality", sleeps.len(), MIN_SLEEPS);
        return None;
    }

    let durations: Vec<f64> = sleeps.iter().filter_map(|e| e.duration_hours()).collect();
    let avg_duration = mean(&durations)?;
    let total: f64 = durations.iter().sum();

    let first = sleeps.iter().map(|e| e.timestamp).min()?;
    let last = sleeps.iter().map(|e| e.timestamp).max()?;
    let days = ((last - first).num_days() + 1).max(1) as f64;
    let sleep_per_day = total / days;

    let quality = SleepQuality::classify(sleep_per_day, avg_duration);

    Some(SleepQualityClassification {
        quality,
        score: quality.score(),
        avg_duration_hours: round_to(avg_duration, 1),
        sleep_per_day_hours: round_to(sleep_per_day, 1),
        total_sleep_sessions: sleeps.len(),
        recommendation: quality.recommendation().to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDurationPrediction {
    pub current_hour: u32,
    pub predicted_duration_hours: f64,
    pub confidence: f64,
    pub r_squared: f64,
}

/// Predict how long a session starting now would last
///
/// Least squares of duration on start hour; confidence is R² in percent.
pub fn predict_sleep_duration(
    sleeps: &[Event],
    now: DateTime<FixedOffset>,
) -> Option<SleepDurationPrediction> {
    if sleeps.len() < MIN_SLEEPS {
        insufficient("sleep_duration", sleeps.len(), MIN_SLEEPS);
        return None;
    }

    let points: Vec<(f64, f64)> = sleeps
        .iter()
        .filter_map(|e| {
            e.duration_hours()
                .map(|d| (f64::from(e.timestamp.hour()), d))
        })
        .collect();

    if points.len() < MIN_SLEEPS {
        insufficient("sleep_duration", points.len(), MIN_SLEEPS);
        return None;
    }

    let fit = linear_regression(&points)?;
    let current_hour = now.hour();
    let predicted = fit.predict(f64::from(current_hour)).max(0.0);

    Some(SleepDurationPrediction {
        current_hour,
        predicted_duration_hours: round_to(predicted, 1),
        confidence: round_to(clamp_percent(fit.r_squared * 100.0), 0),
        r_squared: round_to(fit.r_squared, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, sleep_at};
    use chrono::Duration;

    fn daily_sleeps(days: usize, hours: f64) -> Vec<Event> {
        let start = at("2026-01-01T20:00:00Z");
        (0..days)
            .map(|d| Event::sleep(start + Duration::days(d as i64), Some(hours)))
            .collect()
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(SleepQuality::classify(12.0, 2.0), SleepQuality::Excellent);
        assert_eq!(SleepQuality::classify(13.0, 1.9), SleepQuality::Good);
        assert_eq!(SleepQuality::classify(10.0, 1.5), SleepQuality::Good);
        assert_eq!(SleepQuality::classify(11.0, 1.0), SleepQuality::Fair);
        assert_eq!(SleepQuality::classify(8.0, 0.5), SleepQuality::Fair);
        assert_eq!(SleepQuality::classify(7.9, 3.0), SleepQuality::NeedsImprovement);
    }

    #[test]
    fn test_sleep_quality_gate() {
        assert!(classify_sleep_quality(&daily_sleeps(4, 14.0)).is_none());
        assert!(classify_sleep_quality(&daily_sleeps(5, 14.0)).is_some());
    }

    #[test]
    fn test_excellent_sleep() {
        let result = classify_sleep_quality(&daily_sleeps(10, 14.0)).unwrap();
        assert_eq!(result.quality, SleepQuality::Excellent);
        assert_eq!(result.score, 95);
        assert_eq!(result.sleep_per_day_hours, 14.0);
        assert_eq!(result.avg_duration_hours, 14.0);
        assert_eq!(result.total_sleep_sessions, 10);
    }

    #[test]
    fn test_poor_sleep() {
        let result = classify_sleep_quality(&daily_sleeps(6, 5.0)).unwrap();
        assert_eq!(result.quality, SleepQuality::NeedsImprovement);
        assert_eq!(result.score, 40);
    }

    #[test]
    fn test_sleep_without_durations_is_not_classified() {
        let sleeps: Vec<Event> = (0..6)
            .map(|i| sleep_at(&format!("2026-01-0{}T20:00:00Z", i + 1), None))
            .collect();
        assert!(classify_sleep_quality(&sleeps).is_none());
    }

    #[test]
    fn test_sleep_duration_regression() {
        // duration = 0.5 * hour - 2, exact
        let sleeps = vec![
            sleep_at("2026-01-01T08:00:00Z", Some(2.0)),
            sleep_at("2026-01-01T10:00:00Z", Some(3.0)),
            sleep_at("2026-01-01T12:00:00Z", Some(4.0)),
            sleep_at("2026-01-01T14:00:00Z", Some(5.0)),
            sleep_at("2026-01-01T16:00:00Z", Some(6.0)),
        ];

        let prediction = predict_sleep_duration(&sleeps, at("2026-01-02T18:15:00Z")).unwrap();
        assert_eq!(prediction.current_hour, 18);
        assert_eq!(prediction.predicted_duration_hours, 7.0);
        assert_eq!(prediction.confidence, 100.0);
        assert_eq!(prediction.r_squared, 1.0);

        // Extrapolating below zero is floored
        let prediction = predict_sleep_duration(&sleeps, at("2026-01-02T01:00:00Z")).unwrap();
        assert_eq!(prediction.predicted_duration_hours, 0.0);
    }

    #[test]
    fn test_sleep_duration_needs_durations() {
        let mut sleeps = daily_sleeps(4, 2.0);
        sleeps.push(sleep_at("2026-01-09T20:00:00Z", None));
        assert!(predict_sleep_duration(&sleeps, at("2026-01-10T00:00:00Z")).is_none());

        sleeps.push(sleep_at("2026-01-10T20:00:00Z", Some(3.0)));
        assert!(predict_sleep_duration(&sleeps, at("2026-01-11T00:00:00Z")).is_some());
    }
}
