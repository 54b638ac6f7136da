//! Bagged regression forest.
//!
//! Each tree is a CART regressor grown on a bootstrap sample of the training
//! rows. Every feature is considered at every split and candidate thresholds
//! sit halfway between adjacent distinct values. Trees grow until their
//! leaves are pure unless a depth cap or minimum sample count stops them.
//! The forest predicts the mean of its trees.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 42,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single fitted regression tree stored as a flat node arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree on the rows listed in `samples`. Repeated indices count
    /// once per occurrence.
    fn fit(x: ArrayView2<'_, f64>, y: &[f64], samples: &mut [usize], params: &ForestParams) -> Self {
        let x = x.view();
        let mut builder = TreeBuilder {
            x,
            y,
            params,
            nodes: Vec::new(),
        };
        builder.grow(samples, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

struct TreeBuilder<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [f64],
    params: &'a ForestParams,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let n = samples.len();
        let mean = samples.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        let first = self.y[samples[0]];
        let pure = samples.iter().all(|&i| self.y[i] == first);
        if depth_reached || pure || n < self.params.min_samples_split.max(2) {
            return id;
        }

        let Some(split) = self.best_split(samples) else {
            return id;
        };

        let mut mid = 0;
        for j in 0..n {
            if self.x[[samples[j], split.feature]] <= split.threshold {
                samples.swap(mid, j);
                mid += 1;
            }
        }
        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Find the split maximising `sum_l^2 / n_l + sum_r^2 / n_r`, which is
    /// equivalent to minimising the children's summed squared error.
    fn best_split(&self, samples: &[usize]) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..self.x.ncols() {
            column.clear();
            column.extend(samples.iter().map(|&i| (self.x[[i, feature]], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));
            if column[0].0 == column[n - 1].0 {
                continue;
            }

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += column[k - 1].1;
                if column[k].0 <= column[k - 1].0 {
                    continue;
                }
                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / k as f64
                    + right_sum * right_sum / (n - k) as f64;
                if best.as_ref().map_or(true, |b| score > b.score) {
                    let (lo, hi) = (column[k - 1].0, column[k].0);
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }
        best
    }
}

/// Ensemble of bootstrap-trained regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit the forest on a dense feature matrix and its labels.
    ///
    /// Tree seeds are drawn in order from a generator seeded with
    /// `params.seed`, so two fits on the same data are identical.
    pub fn fit(x: ArrayView2<'_, f64>, y: &[f64], params: ForestParams) -> Result<Self> {
        let n_rows = x.nrows();
        if n_rows == 0 || params.n_trees == 0 {
            return Err(PipelineError::EmptyDataset { rows: n_rows });
        }
        if y.len() != n_rows {
            return Err(PipelineError::schema(format!(
                "{} feature rows but {} labels",
                n_rows,
                y.len()
            )));
        }

        let mut seeder = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        let mut samples = vec![0usize; n_rows];
        for t in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(seeder.gen());
            for s in samples.iter_mut() {
                *s = rng.gen_range(0..n_rows);
            }
            let tree = RegressionTree::fit(x, y, &mut samples, &params);
            debug!(tree = t, nodes = tree.n_nodes(), "grew tree");
            trees.push(tree);
        }

        Ok(Self {
            n_features: x.ncols(),
            trees,
        })
    }

    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::schema(format!(
                "forest expects {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        Ok(x.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
