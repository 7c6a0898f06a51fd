//! Lookback window over one subject's events

use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Event};

/// Events within `[now - days, now]`, partitioned by category
///
/// Each partition is sorted ascending by timestamp; events with equal
/// timestamps keep their input order.
#[derive(Debug, Clone)]
pub struct EventWindow {
    now: DateTime<FixedOffset>,
    start: DateTime<FixedOffset>,
    days: u32,
    feeding: Vec<Event>,
    sleep: Vec<Event>,
    diaper: Vec<Event>,
    health: Vec<Event>,
}

impl EventWindow {
    /// Build a window from an unordered event list
    ///
    /// Both bounds are inclusive. `days` must be at least 1.
    pub fn new(events: &[Event], now: DateTime<FixedOffset>, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::InvalidData(
                "window must cover at least one day".to_string(),
            ));
        }

        // A span reaching past the earliest representable instant covers all history
        let start = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.fixed_offset());
        let mut window = Self {
            now,
            start,
            days,
            feeding: Vec::new(),
            sleep: Vec::new(),
            diaper: Vec::new(),
            health: Vec::new(),
        };

        for event in events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= now)
        {
            window.partition_mut(event.category()).push(event.clone());
        }

        for category in Category::all() {
            // sort_by_key is stable
            window.partition_mut(*category).sort_by_key(|e| e.timestamp);
        }

        debug!(
            supplied = events.len(),
            kept = window.len(),
            days,
            "Built event window"
        );

        Ok(window)
    }

    fn partition_mut(&mut self, category: Category) -> &mut Vec<Event> {
        match category {
            Category::Feeding => &mut self.feeding,
            Category::Sleep => &mut self.sleep,
            Category::Diaper => &mut self.diaper,
            Category::Health => &mut self.health,
        }
    }

    /// Events of one category, oldest first
    pub fn events(&self, category: Category) -> &[Event] {
        match category {
            Category::Feeding => &self.feeding,
            Category::Sleep => &self.sleep,
            Category::Diaper => &self.diaper,
            Category::Health => &self.health,
        }
    }

    pub fn feedings(&self) -> &[Event] {
        &self.feeding
    }

    pub fn sleeps(&self) -> &[Event] {
        &self.sleep
    }

    pub fn diapers(&self) -> &[Event] {
        &self.diaper
    }

    pub fn health(&self) -> &[Event] {
        &self.health
    }

    /// All events in the window, category by category
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.feeding
            .iter()
            .chain(&self.sleep)
            .chain(&self.diaper)
            .chain(&self.health)
    }

    pub fn len(&self) -> usize {
        self.feeding.len() + self.sleep.len() + self.diaper.len() + self.health.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reference instant (window end)
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Window start (`now - days`, or the earliest representable instant)
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Instant halfway between start and now
    pub fn midpoint(&self) -> DateTime<FixedOffset> {
        let half = (self.now - self.start) / 2;
        self.now.checked_sub_signed(half).unwrap_or(self.start)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Window length as a divisor for per-day rates (never below 1)
    pub fn days_divisor(&self) -> f64 {
        f64::from(self.days.max(1))
    }
}
