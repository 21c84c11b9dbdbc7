//! Exploratory analysis and model selection for stroke risk prediction on
//! the healthcare stroke dataset: cleaning, console EDA, a preprocessing
//! recipe fitted per training fold, class-imbalance handling, a comparison
//! of six classifier families under one metric set, and grid-search tuning
//! of the best candidates.

pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod explore;
pub mod io;
pub mod metrics;
pub mod model;
pub mod preprocess;
pub mod records;
pub mod resample;
pub mod split;
pub mod stats;
pub mod tune;

pub use error::{Result, StrokeError};

/// Seed used for every randomized step (splits, folds, resampling) so a run
/// is reproducible end to end.
pub const SEED: u64 = 15;

/// Training share of the holdout split.
pub const TRAIN_FRACTION: f64 = 0.8;
