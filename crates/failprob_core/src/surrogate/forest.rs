//! Random forest of depth-limited classification trees
//!
//! Each tree is grown on a bootstrap resample of the training set. At every
//! node a random subset of `max(1, floor(sqrt(n_features)))` features is
//! searched for the Gini-optimal threshold; constant features do not count
//! toward the subset. The forest predicts `+1` when the mean leaf probability
//! of `+1` across trees exceeds one half.

use nalgebra::DMatrix;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use super::{Classifier, check_training_set, matrix_rows};
use crate::error::FitError;

/// Hyperparameters for [`RandomForest`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    /// Seed for bootstrap and feature sampling, independent of any caller generator
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 2,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Fraction of `+1` labels among the node's samples
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

struct TrainingData<'a> {
    rows: &'a [Vec<f64>],
    labels: &'a [i8],
    max_features: usize,
    max_depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Weighted Gini impurity of a node holding `positives` of `total` samples
#[inline]
fn gini_mass(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    total as f64 * 2.0 * p * (1.0 - p)
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn grow<R: Rng + ?Sized>(data: &TrainingData<'_>, samples: Vec<usize>, rng: &mut R) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(data, samples, 0, rng);
        tree
    }

    fn grow_node<R: Rng + ?Sized>(
        &mut self,
        data: &TrainingData<'_>,
        samples: Vec<usize>,
        depth: usize,
        rng: &mut R,
    ) -> usize {
        let positives = samples.iter().filter(|&&s| data.labels[s] > 0).count();
        let positive = positives as f64 / samples.len() as f64;
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { positive });

        let pure = positives == 0 || positives == samples.len();
        if pure || depth >= data.max_depth || samples.len() < 2 {
            return index;
        }

        let Some(split) = best_split(data, &samples, rng) else {
            return index;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&s| data.rows[s][split.feature] <= split.threshold);

        let left = self.grow_node(data, left_samples, depth + 1, rng);
        let right = self.grow_node(data, right_samples, depth + 1, rng);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn positive_probability(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        fn node_depth(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + node_depth(nodes, *left).max(node_depth(nodes, *right))
                }
            }
        }
        node_depth(&self.nodes, 0)
    }
}

/// Search a random feature subset for the split with the lowest weighted Gini impurity
fn best_split<R: Rng + ?Sized>(
    data: &TrainingData<'_>,
    samples: &[usize],
    rng: &mut R,
) -> Option<BestSplit> {
    let n_features = data.rows[samples[0]].len();
    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);

    let total_positive = samples.iter().filter(|&&s| data.labels[s] > 0).count();
    let mut best: Option<BestSplit> = None;
    let mut visited = 0;

    for feature in features {
        if visited >= data.max_features {
            break;
        }

        let mut column: Vec<(f64, bool)> = samples
            .iter()
            .map(|&s| (data.rows[s][feature], data.labels[s] > 0))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[column.len() - 1].0 {
            continue;
        }
        visited += 1;

        let mut left_positive = 0;
        for i in 0..column.len() - 1 {
            if column[i].1 {
                left_positive += 1;
            }
            let (value, next) = (column[i].0, column[i + 1].0);
            if value == next {
                continue;
            }

            let left_total = i + 1;
            let right_total = column.len() - left_total;
            let impurity = gini_mass(left_positive, left_total)
                + gini_mass(total_positive - left_positive, right_total);

            if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}

/// A fitted random forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on rows of `x` with labels in `{-1, +1}`
    ///
    /// A single-class label set is accepted; every tree is then a single leaf
    /// predicting that class.
    pub fn fit(x: &DMatrix<f64>, y: &[i8], params: &ForestParams) -> Result<Self, FitError> {
        check_training_set(x, y.len())?;
        if params.n_trees == 0 {
            return Err(FitError::InvalidHyperparameter {
                name: "n_trees",
                value: 0.0,
            });
        }

        let rows = matrix_rows(x);
        let n_samples = rows.len();
        let data = TrainingData {
            rows: &rows,
            labels: y,
            max_features: ((x.ncols() as f64).sqrt() as usize).max(1),
            max_depth: params.max_depth,
        };

        let mut master = SmallRng::seed_from_u64(params.seed);
        let trees: Vec<DecisionTree> = (0..params.n_trees)
            .map(|_| {
                let mut rng = SmallRng::seed_from_u64(master.next_u64());
                let bootstrap: Vec<usize> = (0..n_samples)
                    .map(|_| rng.random_range(0..n_samples))
                    .collect();
                DecisionTree::grow(&data, bootstrap, &mut rng)
            })
            .collect();

        tracing::debug!(
            trees = trees.len(),
            max_depth = params.max_depth,
            samples = n_samples,
            "fitted random forest"
        );

        Ok(Self { trees })
    }

    /// Mean probability of `+1` across trees
    pub fn positive_probability(&self, x: &[f64]) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.positive_probability(x))
            .sum();
        total / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Deepest tree in the forest
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }
}

impl Classifier for RandomForest {
    fn predict(&self, x: &[f64]) -> i8 {
        if self.positive_probability(x) > 0.5 { 1 } else { -1 }
    }
}
