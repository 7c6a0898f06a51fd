//! Event builders shared by unit tests

use chrono::{DateTime, Duration, FixedOffset};

use crate::models::{DiaperKind, Event};

/// Parse an RFC 3339 instant
pub fn at(ts: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ts).unwrap()
}

pub fn feeding_at(ts: &str, quantity_ml: Option<f64>) -> Event {
    Event::feeding(at(ts), quantity_ml)
}

pub fn sleep_at(ts: &str, duration_hours: Option<f64>) -> Event {
    Event::sleep(at(ts), duration_hours)
}

pub fn diaper_at(ts: &str, kind: Option<DiaperKind>) -> Event {
    Event::diaper(at(ts), kind)
}

/// `count` feedings spaced `interval_hours` apart, starting at `start`
pub fn feedings_every(
    start: DateTime<FixedOffset>,
    interval_hours: f64,
    count: usize,
    quantity_ml: Option<f64>,
) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let offset = Duration::milliseconds((i as f64 * interval_hours * 3_600_000.0) as i64);
            Event::feeding(start + offset, quantity_ml)
        })
        .collect()
}

/// `count` diaper changes spaced `interval_hours` apart, starting at `start`
pub fn diapers_every(
    start: DateTime<FixedOffset>,
    interval_hours: f64,
    count: usize,
) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let offset = Duration::milliseconds((i as f64 * interval_hours * 3_600_000.0) as i64);
            Event::diaper(start + offset, Some(DiaperKind::Wet))
        })
        .collect()
}
