//! Evaluation metric set shared by every model: confusion-matrix counts and
//! their derived ratios, plus ROC and precision-recall curves computed from
//! continuous scores.

use std::cmp::Ordering;

use log::warn;
use serde::Serialize;

/// Binary confusion matrix. The positive class is label 1.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfusionMatrix {
    pub true_pos: usize,
    pub false_pos: usize,
    pub true_neg: usize,
    pub false_neg: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[i32], y_pred: &[i32]) -> Self {
        assert_eq!(y_true.len(), y_pred.len());
        let mut cm = ConfusionMatrix {
            true_pos: 0,
            false_pos: 0,
            true_neg: 0,
            false_neg: 0,
        };
        for (&truth, &pred) in y_true.iter().zip(y_pred) {
            match (truth == 1, pred == 1) {
                (true, true) => cm.true_pos += 1,
                (false, true) => cm.false_pos += 1,
                (false, false) => cm.true_neg += 1,
                (true, false) => cm.false_neg += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    pub fn accuracy(&self) -> f64 {
        safe_ratio(
            (self.true_pos + self.true_neg) as f64,
            self.total() as f64,
            "accuracy",
        )
    }

    /// Recall of the positive class, TP / (TP + FN).
    pub fn sensitivity(&self) -> f64 {
        safe_ratio(
            self.true_pos as f64,
            (self.true_pos + self.false_neg) as f64,
            "sensitivity",
        )
    }

    /// TN / (TN + FP).
    pub fn specificity(&self) -> f64 {
        safe_ratio(
            self.true_neg as f64,
            (self.true_neg + self.false_pos) as f64,
            "specificity",
        )
    }

    /// Precision, TP / (TP + FP). A model that never predicts the positive
    /// class yields 0 here rather than a division by zero.
    pub fn ppv(&self) -> f64 {
        safe_ratio(
            self.true_pos as f64,
            (self.true_pos + self.false_pos) as f64,
            "PPV",
        )
    }

    /// TN / (TN + FN).
    pub fn npv(&self) -> f64 {
        safe_ratio(
            self.true_neg as f64,
            (self.true_neg + self.false_neg) as f64,
            "NPV",
        )
    }

    /// 2TP / (2TP + FP + FN).
    pub fn f1(&self) -> f64 {
        safe_ratio(
            2.0 * self.true_pos as f64,
            (2 * self.true_pos + self.false_pos + self.false_neg) as f64,
            "F1",
        )
    }
}

/// Ratio with an explicit empty-denominator guard: falls back to zero and
/// logs which metric degenerated.
fn safe_ratio(numerator: f64, denominator: f64, metric: &str) -> f64 {
    if denominator == 0.0 {
        warn!("denominator of {metric} is zero, reporting 0.0");
        0.0
    } else {
        numerator / denominator
    }
}

/// Indices sorted by descending score.
fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    order
}

/// ROC curve points (fpr, tpr), one per distinct score threshold, anchored
/// at (0, 0). Tied scores collapse into a single point.
pub fn roc_curve(y_true: &[i32], scores: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let order = descending_order(scores);
    let pos = y_true.iter().filter(|&&v| v == 1).count() as f64;
    let neg = y_true.len() as f64 - pos;

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut tp = 0.0;
    let mut fp = 0.0;

    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] == 1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        fpr.push(safe_ratio(fp, neg, "ROC fpr"));
        tpr.push(safe_ratio(tp, pos, "ROC tpr"));
    }

    (fpr, tpr)
}

/// Area under the ROC curve by trapezoidal integration. Degenerate inputs
/// (a single class present) report 0.
pub fn roc_auc(y_true: &[i32], scores: &[f64]) -> f64 {
    let pos = y_true.iter().filter(|&&v| v == 1).count();
    if pos == 0 || pos == y_true.len() {
        warn!("ROC-AUC undefined with a single class, reporting 0.0");
        return 0.0;
    }
    let (fpr, tpr) = roc_curve(y_true, scores);
    trapezoid(&fpr, &tpr)
}

/// Precision-recall curve: (precision, recall, thresholds), one point per
/// distinct score, plus the conventional (precision 1, recall 0) anchor.
pub fn precision_recall_curve(y_true: &[i32], scores: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let order = descending_order(scores);
    let pos = y_true.iter().filter(|&&v| v == 1).count() as f64;

    let mut precision = vec![1.0];
    let mut recall = vec![0.0];
    let mut thresholds = Vec::new();
    let mut tp = 0.0;
    let mut fp = 0.0;

    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] == 1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        precision.push(safe_ratio(tp, tp + fp, "PRC precision"));
        recall.push(safe_ratio(tp, pos, "PRC recall"));
        thresholds.push(threshold);
    }

    (precision, recall, thresholds)
}

/// Area under the precision-recall curve by trapezoidal integration.
pub fn pr_auc(y_true: &[i32], scores: &[f64]) -> f64 {
    let pos = y_true.iter().filter(|&&v| v == 1).count();
    if pos == 0 {
        warn!("PR-AUC undefined without positive labels, reporting 0.0");
        return 0.0;
    }
    let (precision, recall, _) = precision_recall_curve(y_true, scores);
    trapezoid(&recall, &precision)
}

/// Average precision: sum of precision weighted by recall increments.
pub fn average_precision(y_true: &[i32], scores: &[f64]) -> f64 {
    let pos = y_true.iter().filter(|&&v| v == 1).count();
    if pos == 0 {
        warn!("average precision undefined without positive labels, reporting 0.0");
        return 0.0;
    }
    let (precision, recall, _) = precision_recall_curve(y_true, scores);
    precision
        .iter()
        .zip(&recall)
        .skip(1)
        .zip(recall.iter())
        .map(|((&p, &r), &r_prev)| (r - r_prev) * p)
        .sum()
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// The full metric set reported for one model on one validation split.
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetrics {
    pub model: String,
    pub accuracy: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub ppv: f64,
    pub npv: f64,
    pub roc_auc: f64,
    pub average_precision: f64,
    pub pr_auc: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
}

pub fn evaluate(model: &str, y_true: &[i32], y_pred: &[i32], scores: &[f64]) -> ModelMetrics {
    let confusion = ConfusionMatrix::from_predictions(y_true, y_pred);
    ModelMetrics {
        model: model.to_string(),
        accuracy: confusion.accuracy(),
        sensitivity: confusion.sensitivity(),
        specificity: confusion.specificity(),
        ppv: confusion.ppv(),
        npv: confusion.npv(),
        roc_auc: roc_auc(y_true, scores),
        average_precision: average_precision(y_true, scores),
        pr_auc: pr_auc(y_true, scores),
        f1: confusion.f1(),
        confusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_validation_size() {
        let y_true = vec![1, 0, 1, 0, 0, 1];
        let y_pred = vec![1, 0, 0, 1, 0, 1];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);
        assert_eq!(cm.total(), 6);
        assert_eq!(cm.true_pos, 2);
        assert_eq!(cm.false_pos, 1);
        assert_eq!(cm.true_neg, 2);
        assert_eq!(cm.false_neg, 1);
    }

    #[test]
    fn perfect_predictions() {
        let y = vec![1, 0, 1, 0];
        let scores = vec![0.9, 0.1, 0.8, 0.2];
        let m = evaluate("perfect", &y, &y, &scores);
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.sensitivity, 1.0);
        assert_eq!(m.specificity, 1.0);
        assert_eq!(m.ppv, 1.0);
        assert_eq!(m.npv, 1.0);
        assert_eq!(m.f1, 1.0);
        assert_eq!(m.roc_auc, 1.0);
        assert!((m.pr_auc - 1.0).abs() < 1e-12);
        assert!((m.average_precision - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_scores_give_zero_auc() {
        let y = vec![1, 0, 1, 0];
        let scores = vec![0.1, 0.9, 0.2, 0.8];
        assert_eq!(roc_auc(&y, &scores), 0.0);
    }

    #[test]
    fn ppv_guard_returns_zero_without_positive_predictions() {
        let y_true = vec![1, 1, 0, 0];
        let y_pred = vec![0, 0, 0, 0];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);
        assert_eq!(cm.ppv(), 0.0);
        assert_eq!(cm.sensitivity(), 0.0);
        assert_eq!(cm.f1(), 0.0);
        // the negative-side metrics are untouched
        assert_eq!(cm.specificity(), 1.0);
        assert_eq!(cm.npv(), 0.5);
    }

    #[test]
    fn metrics_stay_in_unit_interval() {
        let y_true = vec![1, 0, 0, 1, 0, 0, 1, 0];
        let y_pred = vec![1, 1, 0, 0, 0, 1, 1, 0];
        let scores = vec![0.7, 0.6, 0.2, 0.4, 0.1, 0.55, 0.95, 0.3];
        let m = evaluate("mixed", &y_true, &y_pred, &scores);
        for value in [
            m.accuracy,
            m.sensitivity,
            m.specificity,
            m.ppv,
            m.npv,
            m.roc_auc,
            m.average_precision,
            m.pr_auc,
            m.f1,
        ] {
            assert!((0.0..=1.0).contains(&value), "metric out of range: {value}");
        }
    }

    #[test]
    fn roc_curve_is_monotonic() {
        let y = vec![1, 0, 1, 0, 1, 0];
        let scores = vec![0.9, 0.8, 0.7, 0.4, 0.3, 0.2];
        let (fpr, tpr) = roc_curve(&y, &scores);
        assert_eq!(fpr[0], 0.0);
        assert_eq!(tpr[0], 0.0);
        assert!(fpr.windows(2).all(|w| w[1] >= w[0]));
        assert!(tpr.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(*fpr.last().unwrap(), 1.0);
        assert_eq!(*tpr.last().unwrap(), 1.0);
    }

    #[test]
    fn single_class_auc_degenerates_to_zero() {
        let y = vec![0, 0, 0];
        let scores = vec![0.1, 0.5, 0.9];
        assert_eq!(roc_auc(&y, &scores), 0.0);
        assert_eq!(pr_auc(&y, &scores), 0.0);
    }

    #[test]
    fn tied_scores_collapse_into_one_point() {
        let y = vec![1, 0, 1, 0];
        let scores = vec![0.5, 0.5, 0.5, 0.5];
        let (fpr, tpr) = roc_curve(&y, &scores);
        assert_eq!(fpr, vec![0.0, 1.0]);
        assert_eq!(tpr, vec![0.0, 1.0]);
        // random ranking: AUC one half
        assert!((roc_auc(&y, &scores) - 0.5).abs() < 1e-12);
    }
}
