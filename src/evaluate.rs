//! Pipeline orchestration: fit preprocessing on a training fold, resample
//! it, fit a model and score the validation fold. Also the two comparison
//! studies from the analysis: the class-imbalance study on logistic
//! regression and the cross-validated comparison of every family.

use std::fs::{self, File};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::dataset::TabularData;
use crate::error::Result;
use crate::metrics::{self, ModelMetrics};
use crate::model::{fit_predict, ModelFamily, ModelParams};
use crate::preprocess::Preprocessor;
use crate::resample::{resample, ImbalanceStrategy};
use crate::split;

/// Fit on `train`, evaluate on `valid`. Preprocessing statistics come from
/// the training fold only and resampling never touches the validation fold.
pub fn run_pipeline(
    train: &TabularData,
    valid: &TabularData,
    family: ModelFamily,
    params: &ModelParams,
    strategy: ImbalanceStrategy,
    label: &str,
    seed: u64,
) -> Result<ModelMetrics> {
    let preprocessor = Preprocessor::fit(train)?;
    let x_train = preprocessor.transform(train)?;
    let x_valid = preprocessor.transform(valid)?;

    let (x_resampled, y_resampled) = resample(strategy, &x_train, &train.labels, seed)?;
    let predictions = fit_predict(family, params, &x_resampled, &y_resampled, &x_valid)?;

    Ok(metrics::evaluate(
        label,
        &valid.labels,
        &predictions.labels,
        &predictions.scores,
    ))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CvScores {
    pub mean_f1: f64,
    pub mean_recall: f64,
}

/// K-fold cross-validation of the full pipeline. Every fold refits the
/// preprocessor and resamples only its own training part.
pub fn cross_validate(
    data: &TabularData,
    family: ModelFamily,
    params: &ModelParams,
    strategy: ImbalanceStrategy,
    folds: usize,
    seed: u64,
) -> Result<CvScores> {
    let splits = split::kfold(data.len(), folds, seed)?;

    let mut f1_sum = 0.0;
    let mut recall_sum = 0.0;
    for (fold, (train_idx, valid_idx)) in splits.iter().enumerate() {
        let train = data.subset(train_idx);
        let valid = data.subset(valid_idx);
        let scored = run_pipeline(
            &train,
            &valid,
            family,
            params,
            strategy,
            family.name(),
            seed,
        )?;
        debug!(
            "{} fold {}: f1={:.4} recall={:.4}",
            family.name(),
            fold,
            scored.f1,
            scored.sensitivity
        );
        f1_sum += scored.f1;
        recall_sum += scored.sensitivity;
    }

    Ok(CvScores {
        mean_f1: f1_sum / folds as f64,
        mean_recall: recall_sum / folds as f64,
    })
}

/// Logistic regression under the three imbalance treatments, evaluated on
/// the same holdout split.
pub fn imbalance_study(
    train: &TabularData,
    valid: &TabularData,
    seed: u64,
) -> Result<Vec<ModelMetrics>> {
    let params = ModelParams::default();
    let cases = [
        (ImbalanceStrategy::None, "Logistic Regression"),
        (ImbalanceStrategy::ClassWeight, "Logistic Regression (weighted)"),
        (ImbalanceStrategy::Smote, "Logistic Regression (SMOTE)"),
    ];

    let mut results = Vec::with_capacity(cases.len());
    for (strategy, label) in cases {
        info!("imbalance study: fitting {label}");
        results.push(run_pipeline(
            train,
            valid,
            ModelFamily::LogisticRegression,
            &params,
            strategy,
            label,
            seed,
        )?);
    }
    Ok(results)
}

#[derive(Debug, Clone)]
pub struct ModelReport {
    pub family: ModelFamily,
    pub metrics: ModelMetrics,
    pub cv: CvScores,
}

/// Every family through the SMOTE pipeline: cross-validated F1/recall over
/// the whole dataset plus the full metric set on the holdout split.
pub fn compare_models(
    data: &TabularData,
    train: &TabularData,
    valid: &TabularData,
    folds: usize,
    seed: u64,
) -> Result<Vec<ModelReport>> {
    let params = ModelParams::default();

    let mut reports = Vec::with_capacity(ModelFamily::ALL.len());
    for family in ModelFamily::ALL {
        info!("comparing {}", family.name());
        let cv = cross_validate(data, family, &params, ImbalanceStrategy::Smote, folds, seed)?;
        let metrics = run_pipeline(
            train,
            valid,
            family,
            &params,
            ImbalanceStrategy::Smote,
            family.name(),
            seed,
        )?;
        reports.push(ModelReport {
            family,
            metrics,
            cv,
        });
    }

    Ok(reports)
}

/// Flat row shape shared by the CSV and JSON exports.
#[derive(Debug, Serialize)]
struct ReportRow {
    model: String,
    accuracy: f64,
    sensitivity: f64,
    specificity: f64,
    ppv: f64,
    npv: f64,
    roc_auc: f64,
    average_precision: f64,
    pr_auc: f64,
    f1: f64,
    cv_f1: f64,
    cv_recall: f64,
}

impl From<&ModelReport> for ReportRow {
    fn from(report: &ModelReport) -> Self {
        let m = &report.metrics;
        ReportRow {
            model: m.model.clone(),
            accuracy: m.accuracy,
            sensitivity: m.sensitivity,
            specificity: m.specificity,
            ppv: m.ppv,
            npv: m.npv,
            roc_auc: m.roc_auc,
            average_precision: m.average_precision,
            pr_auc: m.pr_auc,
            f1: m.f1,
            cv_f1: report.cv.mean_f1,
            cv_recall: report.cv.mean_recall,
        }
    }
}

/// Write the comparison table to `model_comparison.csv` and
/// `model_comparison.json` under the output directory.
pub fn export_reports<P: AsRef<Path>>(reports: &[ModelReport], out_dir: P) -> Result<()> {
    fs::create_dir_all(&out_dir)?;
    let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();

    let csv_path = out_dir.as_ref().join("model_comparison.csv");
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let json_path = out_dir.as_ref().join("model_comparison.json");
    let file = File::create(&json_path)?;
    serde_json::to_writer_pretty(file, &rows)?;

    info!(
        "exported comparison to {} and {}",
        csv_path.display(),
        json_path.display()
    );
    Ok(())
}

/// Console table of holdout metrics, one row per model.
pub fn print_metrics_table(title: &str, rows: &[ModelMetrics]) {
    println!("\n{title}");
    println!(
        "{:<34} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "model", "accuracy", "sens", "spec", "ppv", "npv", "auroc", "auprc", "f1"
    );
    for m in rows {
        println!(
            "{:<34} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
            m.model, m.accuracy, m.sensitivity, m.specificity, m.ppv, m.npv, m.roc_auc, m.pr_auc,
            m.f1
        );
    }
}

/// Console table for the family comparison, including the CV columns.
pub fn print_report_table(reports: &[ModelReport]) {
    println!("\nMODEL COMPARISON (SMOTE pipeline)");
    println!(
        "{:<22} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "model", "accuracy", "spec", "npv", "auroc", "auprc", "cv_f1", "cv_rec"
    );
    for report in reports {
        let m = &report.metrics;
        println!(
            "{:<22} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
            m.model,
            m.accuracy,
            m.specificity,
            m.npv,
            m.roc_auc,
            m.pr_auc,
            report.cv.mean_f1,
            report.cv.mean_recall
        );
    }
}
