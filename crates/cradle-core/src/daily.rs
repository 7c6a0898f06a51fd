//! Per-calendar-day aggregates shared by clustering, correlation and forecasting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::EventPayload;
use crate::window::EventWindow;

/// Activity totals for one calendar day
///
/// The day is taken from each event's own local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub feeding_count: u32,
    /// Sum of recorded feeding quantities (missing quantities add nothing)
    pub feeding_ml: f64,
    /// Sum of recorded sleep durations (missing durations add nothing)
    pub sleep_hours: f64,
    pub diaper_count: u32,
    /// All events on the day, health included
    pub total_events: u32,
}

impl DailyAggregate {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            feeding_count: 0,
            feeding_ml: 0.0,
            sleep_hours: 0.0,
            diaper_count: 0,
            total_events: 0,
        }
    }
}

/// Aggregate a window by calendar day, oldest day first
///
/// Only days with at least one event appear.
pub fn aggregate_by_day(window: &EventWindow) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();

    for event in window.iter() {
        let date = event.timestamp.date_naive();
        let day = days
            .entry(date)
            .or_insert_with(|| DailyAggregate::empty(date));

        day.total_events += 1;
        match &event.payload {
            EventPayload::Feeding(data) => {
                day.feeding_count += 1;
                day.feeding_ml += data.quantity_ml.unwrap_or(0.0);
            }
            EventPayload::Sleep(data) => {
                day.sleep_hours += data.duration_hours.unwrap_or(0.0);
            }
            EventPayload::Diaper(_) => day.diaper_count += 1,
            EventPayload::Health(_) => {}
        }
    }

    days.into_values().collect()
}
