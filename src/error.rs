//! Error types for training and inference.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or any other frame operation.
    #[error("data frame error: {0}")]
    Csv(#[from] PolarsError),

    #[error("missing required column `{name}`")]
    MissingColumn { name: String },

    #[error("column `{column}` contains non-numeric values")]
    NonNumeric { column: String },

    #[error("column `{column}` has {count} missing values")]
    MissingValues { column: String, count: usize },

    #[error("dataset has too few rows ({rows})")]
    EmptyDataset { rows: usize },

    #[error("model serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A predictor field that cannot be resolved without a terminal.
    #[error("Missing required argument --{name}; provide via flag or use --defaults")]
    MissingArgument { name: &'static str },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
