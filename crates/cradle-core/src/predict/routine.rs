//! Daily routine archetypes via k-means over per-day aggregates

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::daily::{aggregate_by_day, DailyAggregate};
use crate::stats::{mean, round_to, StandardScaler};
use crate::window::EventWindow;

use super::{insufficient, RANDOM_SEED};

pub const MIN_EVENTS: usize = 20;
pub const MIN_DAYS: usize = 3;

const MAX_CLUSTERS: usize = 3;
const N_INIT: usize = 10;
const MAX_ITER: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineType {
    HighSleep,
    FrequentFeeding,
    Normal,
}

impl RoutineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSleep => "high_sleep",
            Self::FrequentFeeding => "frequent_feeding",
            Self::Normal => "normal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HighSleep => "high-sleep days",
            Self::FrequentFeeding => "frequent-feeding days",
            Self::Normal => "normal routine",
        }
    }
}

impl std::fmt::Display for RoutineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineCluster {
    pub cluster_id: usize,
    pub routine: RoutineType,
    pub days_count: usize,
    pub avg_feeding: f64,
    pub avg_sleep_hours: f64,
    pub avg_diaper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineAnalysis {
    pub total_days_analyzed: usize,
    /// Non-empty clusters only
    pub clusters: Vec<RoutineCluster>,
    /// Cluster of the most recent day
    pub current_cluster: usize,
    pub current_routine: RoutineType,
}

fn day_features(day: &DailyAggregate) -> Vec<f64> {
    vec![
        f64::from(day.feeding_count),
        day.sleep_hours,
        f64::from(day.diaper_count),
    ]
}

/// Group days into up to three routine archetypes
///
/// Features (feeding count, sleep hours, diaper count) are standardized
/// before clustering; labels compare each cluster's raw means with the
/// mean over all days.
pub fn identify_routine_clusters(window: &EventWindow) -> Option<RoutineAnalysis> {
    if window.len() < MIN_EVENTS {
        insufficient("routine_clusters", window.len(), MIN_EVENTS);
        return None;
    }

    let days = aggregate_by_day(window);
    if days.len() < MIN_DAYS {
        insufficient("routine_clusters", days.len(), MIN_DAYS);
        return None;
    }

    let raw: Vec<Vec<f64>> = days.iter().map(day_features).collect();
    let scaler = StandardScaler::fit(&raw)?;
    let scaled: Vec<Vec<f64>> = raw.iter().map(|r| scaler.transform(r)).collect();

    let k = MAX_CLUSTERS.min(days.len());
    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
    let model = KMeans::fit(&scaled, k, &mut rng)?;

    let global_feeding = scaler.means()[0];
    let global_sleep = scaler.means()[1];

    let mut clusters = Vec::new();
    for cluster_id in 0..k {
        let members: Vec<&Vec<f64>> = raw
            .iter()
            .zip(&model.labels)
            .filter(|(_, label)| **label == cluster_id)
            .map(|(row, _)| row)
            .collect();
        if members.is_empty() {
            continue;
        }

        let column = |idx: usize| members.iter().map(|r| r[idx]).collect::<Vec<_>>();
        let avg_feeding = mean(&column(0))?;
        let avg_sleep = mean(&column(1))?;
        let avg_diaper = mean(&column(2))?;

        let routine = if avg_sleep > global_sleep + 0.5 {
            RoutineType::HighSleep
        } else if avg_feeding > global_feeding + 1.0 {
            RoutineType::FrequentFeeding
        } else {
            RoutineType::Normal
        };

        clusters.push(RoutineCluster {
            cluster_id,
            routine,
            days_count: members.len(),
            avg_feeding: round_to(avg_feeding, 1),
            avg_sleep_hours: round_to(avg_sleep, 1),
            avg_diaper: round_to(avg_diaper, 1),
        });
    }

    let latest = scaled.last()?;
    let current_cluster = model.nearest(latest);
    let current_routine = clusters
        .iter()
        .find(|c| c.cluster_id == current_cluster)
        .map(|c| c.routine)
        .unwrap_or(RoutineType::Normal);

    tracing::debug!(
        days = days.len(),
        k,
        inertia = model.inertia,
        "Routine clustering"
    );

    Some(RoutineAnalysis {
        total_days_analyzed: days.len(),
        clusters,
        current_cluster,
        current_routine,
    })
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Lloyd's algorithm with k-means++ seeding, best of several restarts
struct KMeans {
    centroids: Vec<Vec<f64>>,
    labels: Vec<usize>,
    inertia: f64,
}

impl KMeans {
    fn fit<R: Rng>(data: &[Vec<f64>], k: usize, rng: &mut R) -> Option<Self> {
        if data.is_empty() || k == 0 || k > data.len() {
            return None;
        }

        let mut best: Option<Self> = None;
        for _ in 0..N_INIT {
            let run = Self::run(data, Self::seed_centroids(data, k, rng));
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        best
    }

    /// k-means++: each new centroid is drawn with probability proportional
    /// to its squared distance from the nearest centroid chosen so far
    fn seed_centroids<R: Rng>(data: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
        let mut centroids = vec![data[rng.random_range(0..data.len())].clone()];

        while centroids.len() < k {
            let weights: Vec<f64> = data
                .iter()
                .map(|p| {
                    centroids
                        .iter()
                        .map(|c| squared_distance(p, c))
                        .fold(f64::MAX, f64::min)
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let pick = if total <= f64::EPSILON {
                rng.random_range(0..data.len())
            } else {
                let mut target = rng.random::<f64>() * total;
                let mut chosen = data.len() - 1;
                for (i, w) in weights.iter().enumerate() {
                    if target < *w {
                        chosen = i;
                        break;
                    }
                    target -= w;
                }
                chosen
            };
            centroids.push(data[pick].clone());
        }

        centroids
    }

    fn run(data: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> Self {
        let mut labels = vec![usize::MAX; data.len()];

        for _ in 0..MAX_ITER {
            let mut changed = false;
            for (label, point) in labels.iter_mut().zip(data) {
                let nearest = nearest_centroid(&centroids, point);
                if *label != nearest {
                    *label = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            for (idx, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = data
                    .iter()
                    .zip(&labels)
                    .filter(|(_, label)| **label == idx)
                    .map(|(p, _)| p)
                    .collect();
                // An emptied cluster keeps its previous centroid
                if members.is_empty() {
                    continue;
                }
                for (dim, value) in centroid.iter_mut().enumerate() {
                    *value = members.iter().map(|m| m[dim]).sum::<f64>() / members.len() as f64;
                }
            }
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(p, &l)| squared_distance(p, &centroids[l]))
            .sum();

        Self {
            centroids,
            labels,
            inertia,
        }
    }

    fn nearest(&self, point: &[f64]) -> usize {
        nearest_centroid(&self.centroids, point)
    }
}

/// Index of the closest centroid; ties go to the lowest index
fn nearest_centroid(centroids: &[Vec<f64>], point: &[f64]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (idx, c) in centroids.iter().enumerate() {
        let dist = squared_distance(point, c);
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}
