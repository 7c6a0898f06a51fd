//! Feeding anomaly detection
//!
//! Isolation forest over (hour of day, quantity). Points that random
//! axis-aligned cuts isolate quickly get short average path lengths and a
//! high score. The top 10% of scores are flagged.

use chrono::{DateTime, FixedOffset, Timelike};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::stats::{mean, percentile, round_to, std_dev};

use super::{insufficient, RANDOM_SEED};

pub const MIN_FEEDINGS: usize = 10;

/// Quantity assumed for feedings logged without one
pub const DEFAULT_QUANTITY_ML: f64 = 150.0;

const NUM_TREES: usize = 100;
const MAX_SAMPLE_SIZE: usize = 256;
const CONTAMINATION_PERCENTILE: f64 = 90.0;
const MAX_REPORTED: usize = 5;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingAnomaly {
    pub timestamp: DateTime<FixedOffset>,
    pub hour: u32,
    pub quantity_ml: Option<f64>,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub total_feedings: usize,
    pub anomalies_detected: usize,
    /// Percent of feedings flagged
    pub anomaly_rate: f64,
    /// Highest-scoring flagged feedings, at most five
    pub anomalies: Vec<FeedingAnomaly>,
}

/// Flag feedings at unusual hours or with unusual amounts
pub fn detect_feeding_anomalies(feedings: &[Event]) -> Option<AnomalyReport> {
    if feedings.len() < MIN_FEEDINGS {
        insufficient("feeding_anomalies", feedings.len(), MIN_FEEDINGS);
        return None;
    }

    let samples: Vec<[f64; 2]> = feedings
        .iter()
        .map(|e| {
            [
                f64::from(e.timestamp.hour()),
                e.quantity_ml().unwrap_or(DEFAULT_QUANTITY_ML),
            ]
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
    let forest = IsolationForest::fit(&samples, &mut rng);
    let scores: Vec<f64> = samples.iter().map(|s| forest.score(s)).collect();
    let threshold = percentile(&scores, CONTAMINATION_PERCENTILE)?;

    let mut flagged: Vec<usize> = (0..samples.len())
        .filter(|&i| scores[i] > threshold)
        .collect();
    flagged.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let explainer = Explainer::new(&samples);
    let anomalies_detected = flagged.len();
    let anomalies = flagged
        .into_iter()
        .take(MAX_REPORTED)
        .map(|i| {
            let event = &feedings[i];
            FeedingAnomaly {
                timestamp: event.timestamp,
                hour: event.timestamp.hour(),
                quantity_ml: event.quantity_ml(),
                score: round_to(scores[i], 3),
                reason: explainer.reason(&samples[i]),
            }
        })
        .collect();

    tracing::debug!(
        total = feedings.len(),
        flagged = anomalies_detected,
        threshold,
        "Feeding anomaly scan"
    );

    Some(AnomalyReport {
        total_feedings: feedings.len(),
        anomalies_detected,
        anomaly_rate: round_to(anomalies_detected as f64 / feedings.len() as f64 * 100.0, 1),
        anomalies,
    })
}

/// Names the feature that sits furthest from its mean, in standard deviations
struct Explainer {
    means: [f64; 2],
    stds: [f64; 2],
}

impl Explainer {
    fn new(samples: &[[f64; 2]]) -> Self {
        let column = |idx: usize| samples.iter().map(|s| s[idx]).collect::<Vec<_>>();
        let hours = column(0);
        let amounts = column(1);
        Self {
            means: [mean(&hours).unwrap_or(0.0), mean(&amounts).unwrap_or(0.0)],
            stds: [std_dev(&hours).unwrap_or(0.0), std_dev(&amounts).unwrap_or(0.0)],
        }
    }

    fn z(&self, sample: &[f64; 2], idx: usize) -> f64 {
        if self.stds[idx] > f64::EPSILON {
            ((sample[idx] - self.means[idx]) / self.stds[idx]).abs()
        } else {
            0.0
        }
    }

    fn reason(&self, sample: &[f64; 2]) -> String {
        let hour_z = self.z(sample, 0);
        let amount_z = self.z(sample, 1);

        if hour_z == 0.0 && amount_z == 0.0 {
            "Unusual combination of time and amount".to_string()
        } else if hour_z >= amount_z {
            format!("Unusual time of day ({:02}:00)", sample[0] as u32)
        } else {
            let direction = if sample[1] > self.means[1] {
                "above"
            } else {
                "below"
            };
            format!(
                "Unusual amount ({:.0} ml, {} the usual {:.0} ml)",
                sample[1], direction, self.means[1]
            )
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

struct IsolationForest {
    trees: Vec<IsolationNode>,
    normalizer: f64,
}

impl IsolationForest {
    fn fit<R: Rng>(data: &[[f64; 2]], rng: &mut R) -> Self {
        let sample_size = data.len().min(MAX_SAMPLE_SIZE);
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let mut trees = Vec::with_capacity(NUM_TREES);
        for _ in 0..NUM_TREES {
            // Without replacement
            let sample: Vec<[f64; 2]> = rand::seq::index::sample(rng, data.len(), sample_size)
                .iter()
                .map(|i| data[i])
                .collect();
            trees.push(IsolationNode::build(&sample, 0, max_depth, rng));
        }

        Self {
            trees,
            normalizer: average_path_length(sample_size),
        }
    }

    /// Anomaly score in (0, 1]; higher is more isolated
    fn score(&self, sample: &[f64; 2]) -> f64 {
        if self.trees.is_empty() || self.normalizer <= 0.0 {
            return 0.5;
        }

        let total: f64 = self.trees.iter().map(|t| t.path_length(sample, 0)).sum();
        let avg_path = total / self.trees.len() as f64;
        2f64.powf(-avg_path / self.normalizer)
    }
}

enum IsolationNode {
    Internal {
        feature_idx: usize,
        split_value: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

impl IsolationNode {
    fn build<R: Rng>(samples: &[[f64; 2]], depth: usize, max_depth: usize, rng: &mut R) -> Self {
        if depth >= max_depth || samples.len() <= 1 {
            return Self::Leaf {
                size: samples.len(),
            };
        }

        let feature_idx = rng.random_range(0..2);
        let (min_val, max_val) = samples.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
            (lo.min(s[feature_idx]), hi.max(s[feature_idx]))
        });

        if max_val - min_val <= f64::EPSILON {
            return Self::Leaf {
                size: samples.len(),
            };
        }

        let split_value = rng.random_range(min_val..max_val);
        let (left, right): (Vec<[f64; 2]>, Vec<[f64; 2]>) = samples
            .iter()
            .partition(|s| s[feature_idx] < split_value);

        Self::Internal {
            feature_idx,
            split_value,
            left: Box::new(Self::build(&left, depth + 1, max_depth, rng)),
            right: Box::new(Self::build(&right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, sample: &[f64; 2], depth: usize) -> f64 {
        match self {
            Self::Leaf { size } => depth as f64 + average_path_length(*size),
            Self::Internal {
                feature_idx,
                split_value,
                left,
                right,
            } => {
                let next = if sample[*feature_idx] < *split_value {
                    left
                } else {
                    right
                };
                next.path_length(sample, depth + 1)
            }
        }
    }
}
