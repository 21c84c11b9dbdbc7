//! Fit/transform preprocessing recipe: mean imputation and standardization
//! for numeric columns, most-frequent imputation and one-hot encoding for
//! categorical columns. Statistics are fitted on the training fold only and
//! reapplied to validation data; categories unseen at fit time encode to
//! all zeros, mirroring sklearn's `handle_unknown='ignore'`.

use std::collections::HashMap;

use log::warn;

use crate::dataset::TabularData;
use crate::error::Result;
use crate::stats;

#[derive(Debug, Clone)]
struct NumericStats {
    name: String,
    /// Imputation mean. Imputing with the mean leaves the column mean
    /// unchanged, so the same value centers the data when scaling.
    mean: f64,
    std: f64,
}

#[derive(Debug, Clone)]
struct CategoricalStats {
    name: String,
    mode: String,
    /// Seen categories in sorted order; one output column each.
    categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    numeric: Vec<NumericStats>,
    categorical: Vec<CategoricalStats>,
    feature_names: Vec<String>,
}

impl Preprocessor {
    pub fn fit(data: &TabularData) -> Result<Self> {
        let mut numeric = Vec::with_capacity(data.numeric.len());
        for col in &data.numeric {
            let present: Vec<f64> = col.values.iter().flatten().copied().collect();
            let mean = match stats::mean(&present) {
                Some(m) => m,
                None => {
                    warn!("column {} has no observed values, imputing 0", col.name);
                    0.0
                }
            };
            let imputed: Vec<f64> = col.values.iter().map(|v| v.unwrap_or(mean)).collect();
            let std = match stats::std_dev(&imputed) {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            };
            numeric.push(NumericStats {
                name: col.name.clone(),
                mean,
                std,
            });
        }

        let mut categorical = Vec::with_capacity(data.categorical.len());
        for col in &data.categorical {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for value in col.values.iter().flatten() {
                *counts.entry(value.as_str()).or_insert(0) += 1;
            }

            // Deterministic mode: highest count, ties broken lexicographically.
            let mut mode = String::new();
            let mut best = 0;
            let mut keys: Vec<&str> = counts.keys().copied().collect();
            keys.sort_unstable();
            for key in keys.iter() {
                if counts[key] > best {
                    best = counts[key];
                    mode = key.to_string();
                }
            }
            if mode.is_empty() {
                warn!("column {} has no observed categories", col.name);
            }

            let categories: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
            categorical.push(CategoricalStats {
                name: col.name.clone(),
                mode,
                categories,
            });
        }

        let mut feature_names: Vec<String> =
            numeric.iter().map(|stats| stats.name.clone()).collect();
        for col in &categorical {
            for category in &col.categories {
                feature_names.push(format!("{}_{}", col.name, category));
            }
        }

        Ok(Preprocessor {
            numeric,
            categorical,
            feature_names,
        })
    }

    /// Transform to dense feature rows: standardized numerics first, then
    /// the one-hot blocks in fitted column order. The output contains no
    /// NaN values.
    pub fn transform(&self, data: &TabularData) -> Result<Vec<Vec<f64>>> {
        let n = data.len();
        let mut rows = vec![Vec::with_capacity(self.feature_names.len()); n];

        for (stats, col) in self.numeric.iter().zip(&data.numeric) {
            debug_assert_eq!(stats.name, col.name);
            for (row, value) in rows.iter_mut().zip(&col.values) {
                let v = value.unwrap_or(stats.mean);
                row.push((v - stats.mean) / stats.std);
            }
        }

        for (stats, col) in self.categorical.iter().zip(&data.categorical) {
            debug_assert_eq!(stats.name, col.name);
            for (row, value) in rows.iter_mut().zip(&col.values) {
                let observed = value.as_deref().unwrap_or(stats.mode.as_str());
                for category in &stats.categories {
                    row.push(if category == observed { 1.0 } else { 0.0 });
                }
            }
        }

        debug_assert!(rows
            .iter()
            .all(|row| row.iter().all(|v| v.is_finite())));

        Ok(rows)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
