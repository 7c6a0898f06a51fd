//! Per-category summary statistics
//!
//! Every summary is `None` when its category has no events in the window.
//! Missing payload fields add nothing to totals but are counted separately,
//! so a total of zero can be told apart from "nothing recorded".

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{hours_between, DiaperKind, Event, EventPayload};
use crate::stats::{intervals_hours, mean, std_dev};
use crate::window::EventWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub mean_hours: f64,
    pub std_hours: f64,
}

impl IntervalSummary {
    /// Needs at least two events
    fn from_sorted(events: &[Event]) -> Option<Self> {
        let intervals = intervals_hours(events);
        Some(Self {
            mean_hours: mean(&intervals)?,
            std_hours: std_dev(&intervals)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingSummary {
    pub count: usize,
    pub daily_average: f64,
    /// Feedings that recorded a quantity
    pub with_quantity: usize,
    pub total_ml: f64,
    pub ml_per_day: f64,
    pub interval: Option<IntervalSummary>,
    pub last: DateTime<FixedOffset>,
    pub hours_since_last: f64,
}

impl FeedingSummary {
    pub fn from_window(window: &EventWindow) -> Option<Self> {
        let feedings = window.feedings();
        let last = feedings.last()?.timestamp;
        let days = window.days_divisor();

        let quantities: Vec<f64> = feedings.iter().filter_map(|e| e.quantity_ml()).collect();
        let total_ml: f64 = quantities.iter().sum();

        Some(Self {
            count: feedings.len(),
            daily_average: feedings.len() as f64 / days,
            with_quantity: quantities.len(),
            total_ml,
            ml_per_day: total_ml / days,
            interval: IntervalSummary::from_sorted(feedings),
            last,
            hours_since_last: hours_between(last, window.now()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    pub count: usize,
    pub daily_average: f64,
    /// Sessions that recorded a duration
    pub with_duration: usize,
    pub total_hours: f64,
    pub hours_per_day: f64,
    /// Mean over sessions with a duration
    pub avg_session_hours: Option<f64>,
}

impl SleepSummary {
    pub fn from_window(window: &EventWindow) -> Option<Self> {
        let sleeps = window.sleeps();
        if sleeps.is_empty() {
            return None;
        }
        let days = window.days_divisor();

        let durations: Vec<f64> = sleeps.iter().filter_map(|e| e.duration_hours()).collect();
        let total_hours: f64 = durations.iter().sum();

        Some(Self {
            count: sleeps.len(),
            daily_average: sleeps.len() as f64 / days,
            with_duration: durations.len(),
            total_hours,
            hours_per_day: total_hours / days,
            avg_session_hours: mean(&durations),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperSummary {
    pub count: usize,
    pub daily_average: f64,
    pub wet: usize,
    pub dirty: usize,
    pub both: usize,
    /// Changes logged without a kind
    pub unspecified: usize,
    pub interval: Option<IntervalSummary>,
}

impl DiaperSummary {
    pub fn from_window(window: &EventWindow) -> Option<Self> {
        let diapers = window.diapers();
        if diapers.is_empty() {
            return None;
        }

        let count_kind = |kind: Option<DiaperKind>| {
            diapers.iter().filter(|e| e.diaper_kind() == kind).count()
        };

        Some(Self {
            count: diapers.len(),
            daily_average: diapers.len() as f64 / window.days_divisor(),
            wet: count_kind(Some(DiaperKind::Wet)),
            dirty: count_kind(Some(DiaperKind::Dirty)),
            both: count_kind(Some(DiaperKind::Both)),
            unspecified: count_kind(None),
            interval: IntervalSummary::from_sorted(diapers),
        })
    }

    /// Whether any change recorded its kind
    pub fn has_kinds(&self) -> bool {
        self.wet + self.dirty + self.both > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub count: usize,
    pub daily_average: f64,
    /// Most recent recorded temperature, °C
    pub latest_temperature: Option<f64>,
    /// Most recent recorded weight, kg
    pub latest_weight: Option<f64>,
    /// Distinct medications, in first-seen order
    pub medications: Vec<String>,
}

impl HealthSummary {
    pub fn from_window(window: &EventWindow) -> Option<Self> {
        let health = window.health();
        if health.is_empty() {
            return None;
        }

        let records = health.iter().filter_map(|e| match &e.payload {
            EventPayload::Health(data) => Some(data),
            _ => None,
        });

        let mut latest_temperature = None;
        let mut latest_weight = None;
        let mut medications: Vec<String> = Vec::new();
        for data in records {
            // Oldest first, so later values overwrite earlier ones
            latest_temperature = data.temperature.or(latest_temperature);
            latest_weight = data.weight.or(latest_weight);
            if let Some(med) = &data.medication {
                if !medications.contains(med) {
                    medications.push(med.clone());
                }
            }
        }

        Some(Self {
            count: health.len(),
            daily_average: health.len() as f64 / window.days_divisor(),
            latest_temperature,
            latest_weight,
            medications,
        })
    }
}

/// Summary statistics for every category in a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub days: u32,
    pub total_events: usize,
    pub feeding: Option<FeedingSummary>,
    pub sleep: Option<SleepSummary>,
    pub diaper: Option<DiaperSummary>,
    pub health: Option<HealthSummary>,
}

impl DescriptiveStats {
    pub fn from_window(window: &EventWindow) -> Self {
        Self {
            days: window.days(),
            total_events: window.len(),
            feeding: FeedingSummary::from_window(window),
            sleep: SleepSummary::from_window(window),
            diaper: DiaperSummary::from_window(window),
            health: HealthSummary::from_window(window),
        }
    }
}
