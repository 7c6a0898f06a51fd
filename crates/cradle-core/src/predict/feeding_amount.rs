//! Optimal feeding amount from a random forest over feeding context

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{hours_between, Event};
use crate::stats::{clamp_percent, mean, round_to};

use super::tree::{RandomForest, TreeConfig};
use super::{insufficient, RANDOM_SEED};

pub const MIN_FEEDINGS: usize = 10;

const N_TREES: usize = 50;
const MAX_DEPTH: usize = 5;

/// Gap assumed before the first feeding in the window
const FIRST_GAP_HOURS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingAmountPrediction {
    pub predicted_amount_ml: f64,
    pub confidence: f64,
    pub avg_amount_ml: f64,
    /// Training R² of the forest
    pub model_score: f64,
    pub hour: u32,
    /// Monday is 0
    pub weekday: u32,
    pub hours_since_last: f64,
}

fn features(at: DateTime<FixedOffset>, hours_since: f64) -> [f64; 3] {
    [
        f64::from(at.hour()),
        f64::from(at.weekday().num_days_from_monday()),
        hours_since,
    ]
}

/// Predict the quantity for a feeding given now
///
/// Features are hour, weekday and hours since the previous feeding. The gap
/// for each training row is measured to the previous feeding in the window,
/// whether or not that one recorded a quantity.
pub fn predict_feeding_amount(
    feedings: &[Event],
    now: DateTime<FixedOffset>,
) -> Option<FeedingAmountPrediction> {
    if feedings.len() < MIN_FEEDINGS {
        insufficient("feeding_amount", feedings.len(), MIN_FEEDINGS);
        return None;
    }

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for (i, event) in feedings.iter().enumerate() {
        let Some(quantity) = event.quantity_ml() else {
            continue;
        };
        let gap = match i {
            0 => FIRST_GAP_HOURS,
            _ => hours_between(feedings[i - 1].timestamp, event.timestamp),
        };
        rows.push(features(event.timestamp, gap));
        targets.push(quantity);
    }

    if rows.len() < MIN_FEEDINGS {
        insufficient("feeding_amount", rows.len(), MIN_FEEDINGS);
        return None;
    }

    let config = TreeConfig {
        max_depth: MAX_DEPTH,
        ..TreeConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
    let forest = RandomForest::fit(&rows, &targets, N_TREES, config, &mut rng)?;

    let hours_since = feedings
        .last()
        .map(|last| hours_between(last.timestamp, now))
        .unwrap_or(FIRST_GAP_HOURS);
    let context = features(now, hours_since);
    let predicted = forest.predict(&context);
    let score = forest.score(&rows, &targets);

    Some(FeedingAmountPrediction {
        predicted_amount_ml: round_to(predicted, 0),
        confidence: round_to(clamp_percent(score * 100.0), 0),
        avg_amount_ml: round_to(mean(&targets)?, 0),
        model_score: round_to(score, 2),
        hour: now.hour(),
        weekday: now.weekday().num_days_from_monday(),
        hours_since_last: round_to(hours_since, 1),
    })
}
