//! Column preprocessing: one-hot encoding of the location plus numeric
//! passthrough, producing a dense matrix in a column order fixed at fit time.

use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// One-hot encoder for a single string column.
///
/// Categories are the sorted distinct values seen during fit. Values never
/// seen during fit encode to an all-zero vector instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    column: String,
    categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit(series: &Series) -> Result<Self> {
        let values = string_values(series)?;
        let mut categories: Vec<String> = values.iter().map(|s| s.to_string()).collect();
        categories.sort();
        categories.dedup();
        Ok(Self {
            column: series.name().to_string(),
            categories,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn n_features_out(&self) -> usize {
        self.categories.len()
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Applies the location encoder and passes every other feature through.
///
/// Output columns are the encoder's indicators followed by the passthrough
/// columns in the order they appeared in the training frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    encoder: OneHotEncoder,
    passthrough: Vec<String>,
}

impl ColumnTransformer {
    /// Fit on a feature frame, treating `categorical` as the encoded column.
    pub fn fit(features: &DataFrame, categorical: &str) -> Result<Self> {
        let encoder = OneHotEncoder::fit(column(features, categorical)?)?;
        let passthrough: Vec<String> = features
            .get_column_names()
            .into_iter()
            .filter(|name| *name != categorical)
            .map(str::to_string)
            .collect();
        for name in &passthrough {
            numeric_values(column(features, name)?)?;
        }
        Ok(Self {
            encoder,
            passthrough,
        })
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    pub fn n_features_out(&self) -> usize {
        self.encoder.n_features_out() + self.passthrough.len()
    }

    /// Transform a frame into a dense row-major matrix. Columns are looked up
    /// by name, so extra columns and a different column order are tolerated.
    pub fn transform(&self, features: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = features.height();
        let width = self.n_features_out();
        let offset = self.encoder.n_features_out();
        let mut out = Array2::<f64>::zeros((n_rows, width));

        let categories = string_values(column(features, self.encoder.column())?)?;
        for (row, value) in categories.iter().enumerate() {
            if let Some(i) = self.encoder.position(value) {
                out[[row, i]] = 1.0;
            }
        }

        for (j, name) in self.passthrough.iter().enumerate() {
            let values = numeric_values(column(features, name)?)?;
            for (row, v) in values.into_iter().enumerate() {
                out[[row, offset + j]] = v;
            }
        }
        Ok(out)
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name).map_err(|_| PipelineError::MissingColumn {
        name: name.to_string(),
    })
}

fn string_values(series: &Series) -> Result<Vec<&str>> {
    check_nulls(series)?;
    let ca = series.str().map_err(|_| PipelineError::schema(format!(
        "column `{}` must hold strings, found {}",
        series.name(),
        series.dtype()
    )))?;
    Ok(ca.into_no_null_iter().collect())
}

/// Strictly cast a column to f64, rejecting nulls and unparseable values.
pub(crate) fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    check_nulls(series)?;
    let cast = series
        .strict_cast(&DataType::Float64)
        .map_err(|_| PipelineError::NonNumeric {
            column: series.name().to_string(),
        })?;
    let values = cast.f64()?.into_no_null_iter().collect();
    Ok(values)
}

fn check_nulls(series: &Series) -> Result<()> {
    let count = series.null_count();
    if count > 0 {
        return Err(PipelineError::MissingValues {
            column: series.name().to_string(),
            count,
        });
    }
    Ok(())
}
