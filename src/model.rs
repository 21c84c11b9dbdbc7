//! The classifier families under comparison, behind one fit-and-predict
//! entry point. Each family returns hard labels plus a per-row decision
//! score for the ROC and precision-recall curves; logistic regression scores
//! through the sigmoid of its linear decision function, the other families
//! fall back to the predicted label.

use serde::Serialize;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use smartcore::naive_bayes::gaussian::{GaussianNB, GaussianNBParameters};
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};
use smartcore::svm::svc::{SVCParameters, SVC};
use smartcore::svm::Kernels;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelFamily {
    LogisticRegression,
    DecisionTree,
    RandomForest,
    Svm,
    Knn,
    GaussianNaiveBayes,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 6] = [
        ModelFamily::LogisticRegression,
        ModelFamily::DecisionTree,
        ModelFamily::RandomForest,
        ModelFamily::Svm,
        ModelFamily::Knn,
        ModelFamily::GaussianNaiveBayes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::LogisticRegression => "Logistic Regression",
            ModelFamily::DecisionTree => "Decision Tree",
            ModelFamily::RandomForest => "Random Forest",
            ModelFamily::Svm => "SVM",
            ModelFamily::Knn => "KNN",
            ModelFamily::GaussianNaiveBayes => "Gaussian NB",
        }
    }

    /// Families with hyperparameters worth grid searching. Gaussian naive
    /// Bayes has none.
    pub fn tunable(&self) -> bool {
        !matches!(self, ModelFamily::GaussianNaiveBayes)
    }
}

/// Hyperparameters for every family, carried together so a grid search can
/// vary one family's knobs while the rest keep their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Ridge penalty for logistic regression.
    pub lr_alpha: f64,
    pub tree_max_depth: u16,
    pub forest_trees: u16,
    pub forest_max_depth: u16,
    pub svm_c: f64,
    pub svm_gamma: f64,
    pub knn_k: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            lr_alpha: 0.0,
            tree_max_depth: 8,
            forest_trees: 100,
            forest_max_depth: 8,
            svm_c: 1.0,
            svm_gamma: 0.1,
            knn_k: 5,
        }
    }
}

pub struct Predictions {
    pub labels: Vec<i32>,
    pub scores: Vec<f64>,
}

/// Fit one family on the training matrix and predict the validation rows.
pub fn fit_predict(
    family: ModelFamily,
    params: &ModelParams,
    x_train: &[Vec<f64>],
    y_train: &[i32],
    x_valid: &[Vec<f64>],
) -> Result<Predictions> {
    let x = DenseMatrix::from_2d_vec(&x_train.to_vec());
    let xv = DenseMatrix::from_2d_vec(&x_valid.to_vec());

    match family {
        ModelFamily::LogisticRegression => {
            let y = y_train.to_vec();
            let model = LogisticRegression::fit(
                &x,
                &y,
                LogisticRegressionParameters::default().with_alpha(params.lr_alpha),
            )?;
            let labels = model.predict(&xv)?;
            let scores = logistic_scores(&model, x_valid);
            Ok(Predictions { labels, scores })
        }
        ModelFamily::DecisionTree => {
            let y = y_train.to_vec();
            let model = DecisionTreeClassifier::fit(
                &x,
                &y,
                DecisionTreeClassifierParameters::default().with_max_depth(params.tree_max_depth),
            )?;
            let labels = model.predict(&xv)?;
            Ok(label_predictions(labels))
        }
        ModelFamily::RandomForest => {
            let y = y_train.to_vec();
            let model = RandomForestClassifier::fit(
                &x,
                &y,
                RandomForestClassifierParameters::default()
                    .with_n_trees(params.forest_trees)
                    .with_max_depth(params.forest_max_depth),
            )?;
            let labels = model.predict(&xv)?;
            Ok(label_predictions(labels))
        }
        ModelFamily::Svm => {
            // smartcore's SVC wants the classes as -1/+1
            let y: Vec<i32> = y_train.iter().map(|&v| if v > 0 { 1 } else { -1 }).collect();
            let parameters = SVCParameters::default()
                .with_c(params.svm_c)
                .with_kernel(Kernels::rbf().with_gamma(params.svm_gamma));
            let model = SVC::fit(&x, &y, &parameters)?;
            let raw: Vec<f64> = model.predict(&xv)?;
            let labels: Vec<i32> = raw.iter().map(|&v| i32::from(v > 0.0)).collect();
            Ok(label_predictions(labels))
        }
        ModelFamily::Knn => {
            let y = y_train.to_vec();
            let model = KNNClassifier::fit(
                &x,
                &y,
                KNNClassifierParameters::default().with_k(params.knn_k),
            )?;
            let labels = model.predict(&xv)?;
            Ok(label_predictions(labels))
        }
        ModelFamily::GaussianNaiveBayes => {
            // naive bayes labels are unsigned in smartcore
            let y: Vec<u32> = y_train.iter().map(|&v| v as u32).collect();
            let model = GaussianNB::fit(&x, &y, GaussianNBParameters::default())?;
            let labels: Vec<i32> = model.predict(&xv)?.iter().map(|&v| v as i32).collect();
            Ok(label_predictions(labels))
        }
    }
}

fn label_predictions(labels: Vec<i32>) -> Predictions {
    let scores = labels.iter().map(|&v| v as f64).collect();
    Predictions { labels, scores }
}

/// Probability of the positive class from the fitted linear decision
/// function. The coefficient matrix orientation differs between smartcore
/// releases, so both are handled.
fn logistic_scores(
    model: &LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
    rows: &[Vec<f64>],
) -> Vec<f64> {
    let coefficients = model.coefficients();
    let (n_rows, n_cols) = coefficients.shape();
    let weights: Vec<f64> = if n_rows == 1 {
        (0..n_cols).map(|j| *coefficients.get((0, j))).collect()
    } else {
        (0..n_rows).map(|i| *coefficients.get((i, 0))).collect()
    };
    let intercept = *model.intercept().get((0, 0));

    rows.iter()
        .map(|row| {
            let z: f64 = intercept
                + row
                    .iter()
                    .zip(&weights)
                    .map(|(&value, &weight)| value * weight)
                    .sum::<f64>();
            1.0 / (1.0 + (-z).exp())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated clusters, the kind of data every family should
    /// classify correctly.
    fn clusters() -> (Vec<Vec<f64>>, Vec<i32>, Vec<Vec<f64>>, Vec<i32>) {
        let mut x_train = Vec::new();
        let mut y_train = Vec::new();
        for i in 0..20 {
            let offset = (i % 5) as f64 * 0.1;
            x_train.push(vec![0.0 + offset, 0.0 + offset]);
            y_train.push(0);
            x_train.push(vec![10.0 + offset, 10.0 + offset]);
            y_train.push(1);
        }
        let x_valid = vec![vec![0.2, 0.1], vec![10.3, 10.2], vec![0.4, 0.3], vec![9.9, 10.1]];
        let y_valid = vec![0, 1, 0, 1];
        (x_train, y_train, x_valid, y_valid)
    }

    #[test]
    fn every_family_separates_clusters() {
        let (x_train, y_train, x_valid, y_valid) = clusters();
        let params = ModelParams::default();
        for family in ModelFamily::ALL {
            let predictions =
                fit_predict(family, &params, &x_train, &y_train, &x_valid).unwrap();
            assert_eq!(
                predictions.labels, y_valid,
                "{} misclassified the clusters",
                family.name()
            );
            assert_eq!(predictions.scores.len(), y_valid.len());
        }
    }

    #[test]
    fn logistic_scores_are_probabilities() {
        let (x_train, y_train, x_valid, _) = clusters();
        let params = ModelParams::default();
        let predictions = fit_predict(
            ModelFamily::LogisticRegression,
            &params,
            &x_train,
            &y_train,
            &x_valid,
        )
        .unwrap();
        for (&label, &score) in predictions.labels.iter().zip(&predictions.scores) {
            assert!((0.0..=1.0).contains(&score));
            // scores rank the positive class above one half exactly when
            // the hard label is positive
            assert_eq!(label == 1, score > 0.5);
        }
    }

    #[test]
    fn gaussian_nb_is_not_tunable() {
        assert!(!ModelFamily::GaussianNaiveBayes.tunable());
        assert!(ModelFamily::Svm.tunable());
    }
}
