//! House price regression: CSV loading, a one-hot + passthrough
//! preprocessing step, a bagged regression forest, evaluation, persistence,
//! and the input resolution used by the `predict` binary.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

pub mod cli;
pub mod config;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod record;
pub mod report;

pub use config::{Paths, TrainConfig};
pub use error::{PipelineError, Result};
pub use metrics::RegressionMetrics;
pub use pipeline::{predict, HousePricePipeline};
pub use record::FeatureRecord;

use record::TARGET;

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub pipeline: HousePricePipeline,
    pub metrics: RegressionMetrics,
    /// Predictions for every held-out row, in held-out order.
    pub test_predictions: Vec<f64>,
}

pub fn load_csv_file(file_path: impl AsRef<Path>) -> Result<DataFrame> {
    let file_path = file_path.as_ref();
    let file = File::open(file_path).map_err(|e| PipelineError::io(file_path, e))?;
    let df = CsvReader::new(file).has_header(true).finish()?;

    info!(
        path = %file_path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded dataset"
    );
    debug!("{:?}", df.head(Some(5)));

    Ok(df)
}

/// Shuffle row indices with a seeded generator and hold out
/// `ceil(test_size * rows)` of them. Returns `(train, test)`.
pub fn train_test_split(
    df: &DataFrame,
    test_size: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let n = df.height();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::EmptyDataset { rows: n });
    }

    let mut indices: Vec<IdxSize> = (0..n as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_indices = IdxCa::from_vec("", indices[..n_test].to_vec());
    let train_indices = IdxCa::from_vec("", indices[n_test..].to_vec());

    let train_df = df.take(&train_indices)?;
    let test_df = df.take(&test_indices)?;
    debug!(train = train_df.height(), test = test_df.height(), "split dataset");

    Ok((train_df, test_df))
}

/// Separate the label from the features. Feature columns keep their file
/// order; the label must be numeric with no missing values.
pub fn split_features_and_target(df: &DataFrame) -> Result<(DataFrame, Series)> {
    let target = target_column(df)?.clone();
    preprocessing::numeric_values(&target)?;
    let features = df.drop(TARGET)?;

    Ok((features, target))
}

fn target_column(df: &DataFrame) -> Result<&Series> {
    df.column(TARGET).map_err(|_| PipelineError::MissingColumn {
        name: TARGET.to_string(),
    })
}

/// Fit the pipeline on the training partition and score it on the held-out
/// partition.
pub fn train_random_forest_model(
    x_train: &DataFrame,
    y_train: &Series,
    x_test: &DataFrame,
    y_test: &Series,
    config: &TrainConfig,
) -> Result<TrainedModel> {
    let y_train = preprocessing::numeric_values(y_train)?;
    let y_test = preprocessing::numeric_values(y_test)?;

    let pipeline = HousePricePipeline::fit(x_train, &y_train, config.forest_params())?;
    let test_predictions = pipeline.predict_frame(x_test)?;
    let metrics = RegressionMetrics::compute(&y_test, &test_predictions)?;

    Ok(TrainedModel {
        pipeline,
        metrics,
        test_predictions,
    })
}

pub fn run_training(paths: &Paths, config: &TrainConfig) -> Result<TrainedModel> {
    // 1. Load file
    let df = load_csv_file(&paths.dataset)?;

    // 2. Check the label, then split into train and test sets and into
    // features and target
    preprocessing::numeric_values(target_column(&df)?)?;
    let (train_df, test_df) = train_test_split(&df, config.test_size, config.seed)?;
    let (x_train, y_train) = split_features_and_target(&train_df)?;
    let (x_test, y_test) = split_features_and_target(&test_df)?;

    // 3. Fit and evaluate
    let trained = train_random_forest_model(&x_train, &y_train, &x_test, &y_test, config)?;
    println!("{}", trained.metrics);
    info!(
        rmse = trained.metrics.rmse,
        mae = trained.metrics.mae,
        r2 = trained.metrics.r2,
        "evaluated on held-out rows"
    );

    // 4. Persist the whole pipeline
    trained.pipeline.save(&paths.model)?;

    // 5. Sample predictions for manual inspection
    report::write_sample_report(
        &x_test,
        &y_test,
        &trained.test_predictions,
        config.report_rows,
        &paths.report,
    )?;

    Ok(trained)
}
