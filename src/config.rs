//! Fixed file locations and training hyperparameters.

use std::path::PathBuf;

use crate::forest::ForestParams;

/// Dataset read by the trainer.
pub const DATASET_PATH: &str = "data/house_data.csv";

/// Serialized pipeline shared by the trainer and the predictor.
pub const MODEL_PATH: &str = "house_price_model.bin";

/// Human-readable sample of held-out predictions.
pub const REPORT_PATH: &str = "data/sample_predictions.csv";

/// File locations used by a training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub report: PathBuf,
}

impl Paths {
    /// Same relative layout, rooted at `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            dataset: root.join(DATASET_PATH),
            model: root.join(MODEL_PATH),
            report: root.join(REPORT_PATH),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DATASET_PATH),
            model: PathBuf::from(MODEL_PATH),
            report: PathBuf::from(REPORT_PATH),
        }
    }
}

/// Hyperparameters for a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub n_trees: usize,
    /// Seeds both the train/test split and the forest.
    pub seed: u64,
    pub test_size: f64,
    pub report_rows: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// `None` grows trees until leaves are pure.
    pub max_depth: Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 42,
            test_size: 0.2,
            report_rows: 20,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_depth: None,
        }
    }
}

impl TrainConfig {
    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            seed: self.seed,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_depth: self.max_depth,
        }
    }
}

/// Values the predictor falls back to under `--defaults`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictDefaults;

impl PredictDefaults {
    pub const AREA: i64 = 1648;
    pub const BEDROOMS: i64 = 4;
    pub const BATHROOMS: i64 = 1;
    pub const YEAR_BUILT: i64 = 1953;
    pub const AGE: i64 = 72;
    pub const LOCATION: &'static str = "Delhi";
}
