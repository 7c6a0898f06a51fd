//! Regression trees and a bagged random forest
//!
//! CART trees split on the threshold that most reduces squared error, with
//! thresholds placed halfway between adjacent distinct feature values. The
//! forest averages trees fit on bootstrap resamples; every split considers
//! all features.

use rand::Rng;

use crate::stats::{mean, r_squared};

/// Fitting parameters shared by the tree and the forest
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        value: f64,
    },
}

impl Node {
    fn predict<const D: usize>(&self, row: &[f64; D]) -> f64 {
        match self {
            Self::Leaf { value } => *value,
            Self::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if row[*feature_idx] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    sse: f64,
}

/// A single CART regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Node,
}

impl RegressionTree {
    /// Fit on rows and targets of equal length; `None` when empty
    pub fn fit<const D: usize>(
        rows: &[[f64; D]],
        targets: &[f64],
        config: TreeConfig,
    ) -> Option<Self> {
        if rows.is_empty() || rows.len() != targets.len() {
            return None;
        }
        let indices: Vec<usize> = (0..rows.len()).collect();
        Some(Self {
            root: Self::build(rows, targets, &indices, 0, config),
        })
    }

    pub fn predict<const D: usize>(&self, row: &[f64; D]) -> f64 {
        self.root.predict(row)
    }

    fn build<const D: usize>(
        rows: &[[f64; D]],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        config: TreeConfig,
    ) -> Node {
        let values: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();
        let value = mean(&values).unwrap_or(0.0);

        if depth >= config.max_depth || indices.len() < config.min_samples_split.max(2) {
            return Node::Leaf { value };
        }

        let parent_sse: f64 = values.iter().map(|v| (v - value).powi(2)).sum();
        let Some(best) = Self::best_split(rows, targets, indices) else {
            return Node::Leaf { value };
        };
        if parent_sse - best.sse <= f64::EPSILON {
            return Node::Leaf { value };
        }

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| rows[i][best.feature_idx] <= best.threshold);

        Node::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left: Box::new(Self::build(rows, targets, &left, depth + 1, config)),
            right: Box::new(Self::build(rows, targets, &right, depth + 1, config)),
        }
    }

    /// Lowest total squared error over every feature and threshold
    fn best_split<const D: usize>(
        rows: &[[f64; D]],
        targets: &[f64],
        indices: &[usize],
    ) -> Option<BestSplit> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| targets[i].powi(2)).sum();
        let mut best: Option<BestSplit> = None;

        for feature_idx in 0..D {
            let mut sorted = indices.to_vec();
            sorted.sort_by(|&a, &b| rows[a][feature_idx].total_cmp(&rows[b][feature_idx]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let y = targets[sorted[pos]];
                left_sum += y;
                left_sq += y * y;

                let here = rows[sorted[pos]][feature_idx];
                let next = rows[sorted[pos + 1]][feature_idx];
                if next - here <= f64::EPSILON {
                    continue;
                }

                let n_left = (pos + 1) as f64;
                let n_right = (n - pos - 1) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left)
                    + (right_sq - right_sum * right_sum / n_right);

                if best.as_ref().is_none_or(|b| sse < b.sse) {
                    best = Some(BestSplit {
                        feature_idx,
                        threshold: (here + next) / 2.0,
                        sse,
                    });
                }
            }
        }

        best
    }
}

/// Bootstrap-aggregated regression trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `n_trees` trees, each on a bootstrap resample drawn from `rng`
    pub fn fit<const D: usize, R: Rng>(
        rows: &[[f64; D]],
        targets: &[f64],
        n_trees: usize,
        config: TreeConfig,
        rng: &mut R,
    ) -> Option<Self> {
        if rows.is_empty() || rows.len() != targets.len() || n_trees == 0 {
            return None;
        }

        let n = rows.len();
        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            let picks: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let sample_rows: Vec<[f64; D]> = picks.iter().map(|&i| rows[i]).collect();
            let sample_targets: Vec<f64> = picks.iter().map(|&i| targets[i]).collect();
            trees.push(RegressionTree::fit(&sample_rows, &sample_targets, config)?);
        }

        Some(Self { trees })
    }

    pub fn predict<const D: usize>(&self, row: &[f64; D]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    /// R² of the forest's predictions against `targets`
    pub fn score<const D: usize>(&self, rows: &[[f64; D]], targets: &[f64]) -> f64 {
        let predicted: Vec<f64> = rows.iter().map(|r| self.predict(r)).collect();
        r_squared(targets, &predicted)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_tree_learns_step_function() {
        let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 100.0 } else { 200.0 }).collect();

        let tree = RegressionTree::fit(&rows, &targets, TreeConfig::default()).unwrap();
        assert_eq!(tree.predict(&[2.0]), 100.0);
        assert_eq!(tree.predict(&[7.0]), 200.0);
        // Threshold sits halfway between 4 and 5
        assert_eq!(tree.predict(&[4.4]), 100.0);
        assert_eq!(tree.predict(&[4.6]), 200.0);
    }

    #[test]
    fn test_tree_picks_informative_feature() {
        // Feature 0 is noise, feature 1 decides the target
        let rows: Vec<[f64; 2]> = (0..12)
            .map(|i| [(i * 7 % 5) as f64, (i % 2) as f64])
            .collect();
        let targets: Vec<f64> = rows.iter().map(|r| r[1] * 50.0 + 80.0).collect();

        let tree = RegressionTree::fit(&rows, &targets, TreeConfig::default()).unwrap();
        assert_eq!(tree.predict(&[3.0, 0.0]), 80.0);
        assert_eq!(tree.predict(&[3.0, 1.0]), 130.0);
    }

    #[test]
    fn test_depth_zero_is_mean() {
        let rows = [[0.0], [1.0]];
        let config = TreeConfig {
            max_depth: 0,
            min_samples_split: 2,
        };
        let tree = RegressionTree::fit(&rows, &[10.0, 20.0], config).unwrap();
        assert_eq!(tree.predict(&[5.0]), 15.0);
    }

    #[test]
    fn test_fit_rejects_mismatched_input() {
        assert!(RegressionTree::fit::<1>(&[], &[], TreeConfig::default()).is_none());
        assert!(RegressionTree::fit(&[[1.0]], &[1.0, 2.0], TreeConfig::default()).is_none());
    }

    #[test]
    fn test_forest_fits_training_data() {
        let rows: Vec<[f64; 1]> = (0..20).map(|i| [i as f64]).collect();
        let targets: Vec<f64> = (0..20).map(|i| 100.0 + 5.0 * i as f64).collect();

        let mut rng = StdRng::seed_from_u64(42);
        let forest =
            RandomForest::fit(&rows, &targets, 50, TreeConfig::default(), &mut rng).unwrap();

        assert_eq!(forest.len(), 50);
        assert!(forest.score(&rows, &targets) > 0.9);
        let low = forest.predict(&[1.0]);
        let high = forest.predict(&[18.0]);
        assert!(low < high);
    }

    #[test]
    fn test_forest_is_deterministic_for_seed() {
        let rows: Vec<[f64; 2]> = (0..15).map(|i| [i as f64, (i % 4) as f64]).collect();
        let targets: Vec<f64> = (0..15).map(|i| ((i * 37) % 11) as f64).collect();

        let fit = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            RandomForest::fit(&rows, &targets, 10, TreeConfig::default(), &mut rng)
                .unwrap()
                .predict(&[7.5, 1.0])
        };
        assert_eq!(fit(42), fit(42));
    }
}
