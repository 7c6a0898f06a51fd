//! Next-week forecast
//!
//! Per-day rates are the mean of the trailing week of days that have events.
//! The feeding trend compares the last three days with the four before them.

use serde::{Deserialize, Serialize};

use crate::daily::{aggregate_by_day, DailyAggregate};
use crate::stats::{mean, round_to};
use crate::window::EventWindow;

use super::insufficient;

pub const MIN_EVENTS: usize = 14;
pub const MIN_DAYS: usize = 7;

const TRAILING_DAYS: usize = 7;
const RECENT_DAYS: usize = 3;
/// Days analyzed before confidence is high
const HIGH_CONFIDENCE_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }

    /// Recent above 110% of older is increasing, below 90% decreasing
    pub fn classify(recent: f64, older: f64) -> Self {
        if recent > older * 1.1 {
            Self::Increasing
        } else if recent < older * 0.9 {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastConfidence {
    Medium,
    High,
}

impl ForecastConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyForecast {
    pub days_analyzed: usize,
    pub feeding_per_day: f64,
    pub sleep_hours_per_day: f64,
    pub diaper_per_day: f64,
    pub feeding_trend: Trend,
    pub confidence: ForecastConfidence,
}

fn trailing_mean(
    days: &[DailyAggregate],
    n: usize,
    f: impl Fn(&DailyAggregate) -> f64,
) -> Option<f64> {
    let values: Vec<f64> = days[days.len().saturating_sub(n)..].iter().map(f).collect();
    mean(&values)
}

fn feeding_trend(days: &[DailyAggregate]) -> Option<Trend> {
    if days.len() < TRAILING_DAYS {
        return Some(Trend::Stable);
    }

    let counts: Vec<f64> = days.iter().map(|d| f64::from(d.feeding_count)).collect();
    let n = counts.len();
    let recent = mean(&counts[n - RECENT_DAYS..])?;
    let older = mean(&counts[n - TRAILING_DAYS..n - RECENT_DAYS])?;
    Some(Trend::classify(recent, older))
}

/// Forecast daily feeding, sleep and diaper rates for the coming week
pub fn forecast_next_week(window: &EventWindow) -> Option<WeeklyForecast> {
    if window.len() < MIN_EVENTS {
        insufficient("forecast", window.len(), MIN_EVENTS);
        return None;
    }

    let days = aggregate_by_day(window);
    if days.len() < MIN_DAYS {
        insufficient("forecast", days.len(), MIN_DAYS);
        return None;
    }

    let feeding = trailing_mean(&days, TRAILING_DAYS, |d| f64::from(d.feeding_count))?;
    let sleep = trailing_mean(&days, TRAILING_DAYS, |d| d.sleep_hours)?;
    let diaper = trailing_mean(&days, TRAILING_DAYS, |d| f64::from(d.diaper_count))?;

    let confidence = if days.len() < HIGH_CONFIDENCE_DAYS {
        ForecastConfidence::Medium
    } else {
        ForecastConfidence::High
    };

    Some(WeeklyForecast {
        days_analyzed: days.len(),
        feeding_per_day: round_to(feeding, 1),
        sleep_hours_per_day: round_to(sleep, 1),
        diaper_per_day: round_to(diaper, 1),
        feeding_trend: feeding_trend(&days)?,
        confidence,
    })
}
