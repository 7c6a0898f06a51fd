//! Feeding vs sleep correlation over per-day aggregates

use serde::{Deserialize, Serialize};

use crate::daily::aggregate_by_day;
use crate::stats::{mean, pearson, round_to};
use crate::window::EventWindow;

use super::insufficient;

pub const MIN_FEEDINGS: usize = 5;
pub const MIN_SLEEPS: usize = 5;
pub const MIN_SHARED_DAYS: usize = 3;

/// Coefficients at or below this magnitude are not reported
const SIGNIFICANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let r = r.abs();
        if r < 0.3 {
            Self::Weak
        } else if r < 0.7 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

impl CorrelationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Which daily series were correlated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationPair {
    FrequencySleep,
    AmountSleep,
}

impl CorrelationPair {
    fn description(&self) -> &'static str {
        match self {
            Self::FrequencySleep => "feeding frequency and sleep hours",
            Self::AmountSleep => "feeding amount and sleep duration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFinding {
    pub pair: CorrelationPair,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    pub message: String,
}

impl CorrelationFinding {
    fn new(pair: CorrelationPair, r: f64) -> Self {
        let strength = CorrelationStrength::from_coefficient(r);
        let direction = if r > 0.0 {
            CorrelationDirection::Positive
        } else {
            CorrelationDirection::Negative
        };
        let message = format!(
            "{} {} correlation between {}",
            capitalize(strength.as_str()),
            direction.as_str(),
            pair.description()
        );
        Self {
            pair,
            coefficient: round_to(r, 2),
            strength,
            direction,
            message,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub days_analyzed: usize,
    /// `None` when either series has zero variance
    pub frequency_sleep: Option<f64>,
    /// `None` when a day has no recorded amount or the series are degenerate
    pub amount_sleep: Option<f64>,
    pub findings: Vec<CorrelationFinding>,
    pub avg_feeding_per_day: f64,
    pub avg_sleep_per_day: f64,
}

impl CorrelationAnalysis {
    /// First two findings joined for display
    pub fn summary(&self) -> String {
        if self.findings.is_empty() {
            return "No significant correlation detected".to_string();
        }
        self.findings
            .iter()
            .take(2)
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Correlate daily feeding with daily sleep
///
/// Only days with at least one feeding and some recorded sleep take part.
pub fn analyze_feeding_sleep_correlation(window: &EventWindow) -> Option<CorrelationAnalysis> {
    let feedings = window.feedings().len();
    let sleeps = window.sleeps().len();
    if feedings < MIN_FEEDINGS || sleeps < MIN_SLEEPS {
        insufficient("correlation", feedings.min(sleeps), MIN_FEEDINGS);
        return None;
    }

    let days: Vec<_> = aggregate_by_day(window)
        .into_iter()
        .filter(|d| d.feeding_count > 0 && d.sleep_hours > 0.0)
        .collect();
    if days.len() < MIN_SHARED_DAYS {
        insufficient("correlation", days.len(), MIN_SHARED_DAYS);
        return None;
    }

    let counts: Vec<f64> = days.iter().map(|d| f64::from(d.feeding_count)).collect();
    let amounts: Vec<f64> = days.iter().map(|d| d.feeding_ml).collect();
    let sleep: Vec<f64> = days.iter().map(|d| d.sleep_hours).collect();

    let frequency_sleep = pearson(&counts, &sleep);
    let amount_sleep = if amounts.iter().all(|a| *a > 0.0) {
        pearson(&amounts, &sleep)
    } else {
        None
    };

    let findings = [
        (CorrelationPair::FrequencySleep, frequency_sleep),
        (CorrelationPair::AmountSleep, amount_sleep),
    ]
    .into_iter()
    .filter_map(|(pair, r)| r.map(|r| (pair, r)))
    .filter(|(_, r)| r.abs() > SIGNIFICANCE)
    .map(|(pair, r)| CorrelationFinding::new(pair, r))
    .collect();

    Some(CorrelationAnalysis {
        days_analyzed: days.len(),
        frequency_sleep: frequency_sleep.map(|r| round_to(r, 2)),
        amount_sleep: amount_sleep.map(|r| round_to(r, 2)),
        findings,
        avg_feeding_per_day: round_to(mean(&counts)?, 1),
        avg_sleep_per_day: round_to(mean(&sleep)?, 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::test_utils::at;
    use chrono::Duration;

    /// One day per entry: (feedings, ml per feeding, total sleep split in two)
    fn days(profile: &[(usize, Option<f64>, f64)]) -> Vec<Event> {
        let start = at("2026-01-01T00:00:00Z");
        let mut events = Vec::new();
        for (d, (feedings, qty, sleep)) in profile.iter().enumerate() {
            let date = start + Duration::days(d as i64);
            for i in 0..*feedings {
                events.push(Event::feeding(date + Duration::hours(6 + i as i64), *qty));
            }
            events.push(Event::sleep(date + Duration::hours(1), Some(sleep / 2.0)));
            events.push(Event::sleep(date + Duration::hours(20), Some(sleep / 2.0)));
        }
        events
    }

    fn window(events: &[Event]) -> EventWindow {
        EventWindow::new(events, at("2026-01-10T00:00:00Z"), 14).unwrap()
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(CorrelationStrength::from_coefficient(0.1), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(-0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.7), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(-1.0), CorrelationStrength::Strong);
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let events = days(&[
            (4, None, 8.0),
            (5, None, 9.0),
            (6, None, 10.0),
            (7, None, 11.0),
            (8, None, 12.0),
        ]);
        let analysis = analyze_feeding_sleep_correlation(&window(&events)).unwrap();

        assert_eq!(analysis.days_analyzed, 5);
        assert_eq!(analysis.frequency_sleep, Some(1.0));
        // No quantities recorded
        assert_eq!(analysis.amount_sleep, None);
        assert_eq!(analysis.findings.len(), 1);

        let finding = &analysis.findings[0];
        assert_eq!(finding.strength, CorrelationStrength::Strong);
        assert_eq!(finding.direction, CorrelationDirection::Positive);
        assert_eq!(
            analysis.summary(),
            "Strong positive correlation between feeding frequency and sleep hours"
        );
        assert_eq!(analysis.avg_feeding_per_day, 6.0);
        assert_eq!(analysis.avg_sleep_per_day, 10.0);
    }

    #[test]
    fn test_amount_correlation() {
        // Constant frequency, amount falls as sleep rises
        let events = days(&[
            (5, Some(160.0), 8.0),
            (5, Some(140.0), 9.0),
            (5, Some(120.0), 10.0),
            (5, Some(100.0), 11.0),
        ]);
        let analysis = analyze_feeding_sleep_correlation(&window(&events)).unwrap();

        assert_eq!(analysis.frequency_sleep, None);
        assert_eq!(analysis.amount_sleep, Some(-1.0));
        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].pair, CorrelationPair::AmountSleep);
        assert_eq!(analysis.findings[0].direction, CorrelationDirection::Negative);
    }

    #[test]
    fn test_weak_correlation_is_not_reported() {
        let events = days(&[
            (1, None, 4.0),
            (2, None, 1.0),
            (3, None, 5.0),
            (4, None, 2.0),
            (5, None, 3.0),
        ]);
        let analysis = analyze_feeding_sleep_correlation(&window(&events)).unwrap();

        assert_eq!(analysis.frequency_sleep, Some(-0.1));
        assert!(analysis.findings.is_empty());
        assert_eq!(analysis.summary(), "No significant correlation detected");
    }

    #[test]
    fn test_correlation_gates() {
        // Only four feedings in total
        let events = days(&[(1, None, 8.0), (1, None, 9.0), (1, None, 10.0), (1, None, 11.0)]);
        assert!(analyze_feeding_sleep_correlation(&window(&events)).is_none());

        // Enough events but only two days with both feeding and sleep
        let events = days(&[(5, None, 8.0), (5, None, 9.0), (0, None, 10.0)]);
        assert!(analyze_feeding_sleep_correlation(&window(&events)).is_none());
    }
}
