//! Grid-search hyperparameter tuning of the top candidate families by
//! cross-validated F1, followed by a holdout evaluation of each winner.

use log::{debug, info};

use crate::dataset::TabularData;
use crate::error::{Result, StrokeError};
use crate::evaluate::{cross_validate, run_pipeline, ModelReport};
use crate::metrics::ModelMetrics;
use crate::model::{ModelFamily, ModelParams};
use crate::resample::ImbalanceStrategy;

/// How many of the best families move on to tuning.
pub const TOP_CANDIDATES: usize = 3;

#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub family: ModelFamily,
    pub best_params: ModelParams,
    pub best_cv_f1: f64,
    pub holdout: ModelMetrics,
}

/// Candidate parameter sets per family, each varied from the defaults.
pub fn param_grid(family: ModelFamily) -> Vec<ModelParams> {
    let base = ModelParams::default();
    let mut grid = Vec::new();
    match family {
        ModelFamily::LogisticRegression => {
            for alpha in [0.0, 0.01, 0.1, 1.0, 10.0, 100.0] {
                grid.push(ModelParams {
                    lr_alpha: alpha,
                    ..base.clone()
                });
            }
        }
        ModelFamily::Svm => {
            for c in [0.1, 1.0, 10.0, 100.0, 1000.0] {
                for gamma in [1.0, 0.1, 0.01, 0.001, 0.0001] {
                    grid.push(ModelParams {
                        svm_c: c,
                        svm_gamma: gamma,
                        ..base.clone()
                    });
                }
            }
        }
        ModelFamily::RandomForest => {
            for trees in [60u16, 100, 140, 180] {
                for depth in [2u16, 4, 6, 8] {
                    grid.push(ModelParams {
                        forest_trees: trees,
                        forest_max_depth: depth,
                        ..base.clone()
                    });
                }
            }
        }
        ModelFamily::DecisionTree => {
            for depth in [2u16, 3, 4, 5, 6, 8] {
                grid.push(ModelParams {
                    tree_max_depth: depth,
                    ..base.clone()
                });
            }
        }
        ModelFamily::Knn => {
            for k in [3usize, 5, 7, 9, 11] {
                grid.push(ModelParams {
                    knn_k: k,
                    ..base.clone()
                });
            }
        }
        ModelFamily::GaussianNaiveBayes => {}
    }
    grid
}

/// The knobs a family actually reads from a parameter set, for logging.
pub fn describe(family: ModelFamily, params: &ModelParams) -> String {
    match family {
        ModelFamily::LogisticRegression => format!("alpha={}", params.lr_alpha),
        ModelFamily::Svm => format!("C={}, gamma={}", params.svm_c, params.svm_gamma),
        ModelFamily::RandomForest => format!(
            "trees={}, max_depth={}",
            params.forest_trees, params.forest_max_depth
        ),
        ModelFamily::DecisionTree => format!("max_depth={}", params.tree_max_depth),
        ModelFamily::Knn => format!("k={}", params.knn_k),
        ModelFamily::GaussianNaiveBayes => "(no hyperparameters)".to_string(),
    }
}

/// Exhaustive search over the family's grid, scored by mean CV F1 with the
/// SMOTE pipeline. Candidates are cross-validated on the training split
/// only, so the holdout never informs parameter selection; the winner is
/// refitted on the full training split and evaluated on the holdout.
pub fn grid_search(
    train: &TabularData,
    valid: &TabularData,
    family: ModelFamily,
    folds: usize,
    seed: u64,
) -> Result<GridSearchResult> {
    let grid = param_grid(family);
    if grid.is_empty() {
        return Err(StrokeError::EmptyGrid {
            family: family.name().to_string(),
        });
    }
    info!(
        "grid search {}: {} candidates, {folds}-fold CV",
        family.name(),
        grid.len()
    );

    let mut best_params = None;
    let mut best_cv_f1 = f64::NEG_INFINITY;
    for params in grid {
        let cv = cross_validate(train, family, &params, ImbalanceStrategy::Smote, folds, seed)?;
        debug!(
            "{} [{}] cv f1={:.4} recall={:.4}",
            family.name(),
            describe(family, &params),
            cv.mean_f1,
            cv.mean_recall
        );
        if cv.mean_f1 > best_cv_f1 {
            best_cv_f1 = cv.mean_f1;
            best_params = Some(params);
        }
    }

    let best_params = best_params.ok_or(StrokeError::EmptyGrid {
        family: family.name().to_string(),
    })?;
    info!(
        "best {}: {} (cv f1={:.4})",
        family.name(),
        describe(family, &best_params),
        best_cv_f1
    );

    let holdout = run_pipeline(
        train,
        valid,
        family,
        &best_params,
        ImbalanceStrategy::Smote,
        &format!("{} (tuned)", family.name()),
        seed,
    )?;

    Ok(GridSearchResult {
        family,
        best_params,
        best_cv_f1,
        holdout,
    })
}

/// Tune the `TOP_CANDIDATES` best families from the comparison, ranked by
/// mean CV F1. Families without hyperparameters are skipped.
pub fn tune_top_candidates(
    reports: &[ModelReport],
    train: &TabularData,
    valid: &TabularData,
    folds: usize,
    seed: u64,
) -> Result<Vec<GridSearchResult>> {
    let mut ranked: Vec<&ModelReport> = reports.iter().filter(|r| r.family.tunable()).collect();
    ranked.sort_by(|a, b| {
        b.cv.mean_f1
            .partial_cmp(&a.cv.mean_f1)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut results = Vec::new();
    for report in ranked.into_iter().take(TOP_CANDIDATES) {
        results.push(grid_search(train, valid, report.family, folds, seed)?);
    }
    Ok(results)
}
