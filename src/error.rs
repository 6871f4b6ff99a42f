use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = SurveyError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("malformed dataset {}: {reason}", path.display())]
    DatasetMalformed { path: PathBuf, reason: String },

    #[error("dataset {dataset:?} has no attribute {attribute:?}")]
    MissingAttribute { dataset: String, attribute: String },

    #[error("denominator {0:?} sums to zero")]
    EmptyDenominator(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("projection failed: {0}")]
    Projection(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("{0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl SurveyError {
    pub(crate) fn missing(dataset: &str, attribute: &str) -> Self {
        Self::MissingAttribute { dataset: dataset.to_string(), attribute: attribute.to_string() }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DatasetMalformed { path: path.into(), reason: reason.to_string() }
    }
}
