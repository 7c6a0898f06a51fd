//! Interval-based next-event predictors (feeding, diaper)

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{hours_between, Event};
use crate::stats::{clamp_percent, intervals_hours, mean, round_to, std_dev};

use super::insufficient;

pub const MIN_FEEDINGS: usize = 3;
pub const MIN_DIAPERS: usize = 5;

/// Mean and spread of the gaps between consecutive events
#[derive(Debug, Clone, Copy)]
struct IntervalStats {
    mean_hours: f64,
    std_hours: f64,
    last: DateTime<FixedOffset>,
}

impl IntervalStats {
    fn from_sorted(events: &[Event]) -> Option<Self> {
        let intervals = intervals_hours(events);
        let mean_hours = mean(&intervals)?;
        let std_hours = if intervals.len() > 1 {
            std_dev(&intervals)?
        } else {
            0.0
        };

        Some(Self {
            mean_hours,
            std_hours,
            last: events.last()?.timestamp,
        })
    }

    fn predicted_next(&self) -> DateTime<FixedOffset> {
        self.last + Duration::milliseconds((self.mean_hours * 3_600_000.0).round() as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextFeedingPrediction {
    pub avg_interval_hours: f64,
    pub std_interval_hours: f64,
    pub hours_since_last: f64,
    /// Negative once the predicted time has passed
    pub hours_until_next: f64,
    pub predicted_time: DateTime<FixedOffset>,
    pub confidence: f64,
    /// More than one standard deviation past the mean interval
    pub is_overdue: bool,
}

/// Predict the next feeding from the mean gap between feedings
///
/// Confidence drops 10 points per hour of interval standard deviation.
pub fn predict_next_feeding(
    feedings: &[Event],
    now: DateTime<FixedOffset>,
) -> Option<NextFeedingPrediction> {
    if feedings.len() < MIN_FEEDINGS {
        insufficient("next_feeding", feedings.len(), MIN_FEEDINGS);
        return None;
    }

    let stats = IntervalStats::from_sorted(feedings)?;
    let predicted_time = stats.predicted_next();
    let hours_since = hours_between(stats.last, now);
    let hours_until = hours_between(now, predicted_time);
    let confidence = clamp_percent(100.0 - stats.std_hours * 10.0);

    Some(NextFeedingPrediction {
        avg_interval_hours: round_to(stats.mean_hours, 1),
        std_interval_hours: round_to(stats.std_hours, 1),
        hours_since_last: round_to(hours_since, 1),
        hours_until_next: round_to(hours_until, 1),
        predicted_time,
        confidence: round_to(confidence, 0),
        is_overdue: hours_since > stats.mean_hours + stats.std_hours,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperChangePrediction {
    pub avg_interval_hours: f64,
    pub hours_since_last: f64,
    /// Zero once the predicted time has passed
    pub minutes_until_next: f64,
    /// Likelihood that a change is due now, in percent
    pub probability: f64,
    pub is_overdue: bool,
    pub predicted_time: DateTime<FixedOffset>,
}

/// Predict the next diaper change and how likely one is due now
///
/// Below the mean interval the probability grows linearly to 50%; past it,
/// 20 points are added per extra hour, capped at 95%.
pub fn predict_diaper_change(
    diapers: &[Event],
    now: DateTime<FixedOffset>,
) -> Option<DiaperChangePrediction> {
    if diapers.len() < MIN_DIAPERS {
        insufficient("diaper_change", diapers.len(), MIN_DIAPERS);
        return None;
    }

    let stats = IntervalStats::from_sorted(diapers)?;
    if stats.mean_hours <= 0.0 {
        // Every change logged at the same instant
        return None;
    }

    let predicted_time = stats.predicted_next();
    let hours_since = hours_between(stats.last, now);
    let minutes_until = hours_between(now, predicted_time) * 60.0;

    let probability = if hours_since >= stats.mean_hours {
        (50.0 + (hours_since - stats.mean_hours) * 20.0).min(95.0)
    } else {
        (hours_since / stats.mean_hours) * 50.0
    };

    Some(DiaperChangePrediction {
        avg_interval_hours: round_to(stats.mean_hours, 1),
        hours_since_last: round_to(hours_since, 1),
        minutes_until_next: round_to(minutes_until.max(0.0), 0),
        probability: round_to(clamp_percent(probability), 0),
        is_overdue: hours_since > stats.mean_hours,
        predicted_time,
    })
}
