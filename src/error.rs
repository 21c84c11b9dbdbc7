use thiserror::Error;

/// Errors produced by the analysis pipeline. Library failures (polars,
/// smartcore, csv, serde_json, io) are wrapped transparently so callers can
/// bubble them up with `?`.
#[derive(Error, Debug)]
pub enum StrokeError {
    #[error("dataset is empty after cleaning")]
    EmptyDataset,
    #[error("target column has {count} null rows")]
    NullTarget { count: usize },
    #[error("cannot split {rows} rows into {folds} folds")]
    BadFoldCount { rows: usize, folds: usize },
    #[error("class {class} has no rows in the training split")]
    DegenerateClass { class: i32 },
    #[error("parameter grid for {family:?} is empty")]
    EmptyGrid { family: String },
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
    #[error(transparent)]
    Model(#[from] smartcore::error::Failed),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StrokeError>;
