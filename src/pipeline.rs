//! The persisted preprocessing + forest unit.

use std::fs;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::forest::{ForestParams, RandomForestRegressor};
use crate::preprocessing::ColumnTransformer;
use crate::record::{FeatureRecord, LOCATION, NUMERIC_FEATURES};

/// A fitted pipeline: the column transformer and the forest it feeds.
///
/// Encoding state lives inside the artifact, so inference never re-derives
/// categories or column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePricePipeline {
    transformer: ColumnTransformer,
    forest: RandomForestRegressor,
}

impl HousePricePipeline {
    pub fn fit(features: &DataFrame, target: &[f64], params: ForestParams) -> Result<Self> {
        if features.height() != target.len() {
            return Err(PipelineError::schema(format!(
                "{} feature rows but {} labels",
                features.height(),
                target.len()
            )));
        }
        let transformer = ColumnTransformer::fit(features, LOCATION)?;
        let x = transformer.transform(features)?;
        info!(
            rows = x.nrows(),
            columns = x.ncols(),
            categories = transformer.encoder().n_features_out(),
            trees = params.n_trees,
            "fitting random forest"
        );
        let forest = RandomForestRegressor::fit(x.view(), target, params)?;
        Ok(Self {
            transformer,
            forest,
        })
    }

    pub fn predict_frame(&self, features: &DataFrame) -> Result<Vec<f64>> {
        let x = self.transformer.transform(features)?;
        self.forest.predict(x.view())
    }

    pub fn transformer(&self) -> &ColumnTransformer {
        &self.transformer
    }

    /// Write the whole pipeline to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes).map_err(|e| PipelineError::io(path, e))?;
        info!(path = %path.display(), "saved pipeline");
        Ok(())
    }

    /// Read a pipeline written by [`save`](Self::save) and check that it can
    /// be fed from a [`FeatureRecord`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
        let pipeline: Self = bincode::deserialize(&bytes)?;
        pipeline.check_record_schema()?;
        info!(path = %path.display(), "loaded pipeline");
        Ok(pipeline)
    }

    fn check_record_schema(&self) -> Result<()> {
        let encoded = self.transformer.encoder().column();
        if encoded != LOCATION {
            return Err(PipelineError::schema(format!(
                "pipeline encodes `{encoded}`, expected `{LOCATION}`"
            )));
        }
        if let Some(unknown) = self
            .transformer
            .passthrough()
            .iter()
            .find(|name| !NUMERIC_FEATURES.contains(&name.as_str()))
        {
            return Err(PipelineError::schema(format!(
                "pipeline expects unknown feature `{unknown}`"
            )));
        }
        if self.transformer.n_features_out() != self.forest.n_features() {
            return Err(PipelineError::schema(format!(
                "transformer yields {} columns but forest expects {}",
                self.transformer.n_features_out(),
                self.forest.n_features()
            )));
        }
        Ok(())
    }
}

/// Price a single house.
pub fn predict(pipeline: &HousePricePipeline, record: &FeatureRecord) -> Result<f64> {
    let frame = record.to_frame()?;
    let predictions = pipeline.predict_frame(&frame)?;
    predictions
        .first()
        .copied()
        .ok_or(PipelineError::EmptyDataset { rows: 0 })
}
