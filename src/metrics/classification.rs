//! Classification metrics for the held-out evaluation split.

use ndarray::Array1;

/// Confusion matrix for binary classification
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    /// True positives
    pub tp: usize,
    /// True negatives
    pub tn: usize,
    /// False positives
    pub fp: usize,
    /// False negatives
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Calculate confusion matrix from binary predictions.
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            let t_bool = t >= 0.5;
            let p_bool = p >= 0.5;

            match (t_bool, p_bool) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
            }
        }

        Self { tp, tn, fp, fn_ }
    }

    /// Total samples
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Formatted confusion matrix.
    pub fn display(&self) -> String {
        format!(
            "Confusion Matrix:\n\
             \n\
             Predicted:    0       1\n\
             Actual 0:   {:>5}   {:>5}  (TN/FP)\n\
             Actual 1:   {:>5}   {:>5}  (FN/TP)\n",
            self.tn, self.fp, self.fn_, self.tp
        )
    }
}

/// Evaluation metrics computed on a held-out split.
#[derive(Debug, Clone)]
pub struct ClassificationMetrics {
    /// Confusion matrix
    pub confusion: ConfusionMatrix,
    /// Accuracy
    pub accuracy: f64,
    /// Precision for the churn class
    pub precision: f64,
    /// Recall for the churn class
    pub recall: f64,
    /// F1 score for the churn class
    pub f1: f64,
    /// Area under the ROC curve
    pub roc_auc: f64,
}

impl ClassificationMetrics {
    /// Compute all metrics from labels, thresholded predictions, and
    /// positive-class probabilities.
    pub fn from_scores(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
        y_proba: &Array1<f64>,
    ) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);

        let accuracy = safe_div((cm.tp + cm.tn) as f64, cm.total() as f64);
        let precision = safe_div(cm.tp as f64, (cm.tp + cm.fp) as f64);
        let recall = safe_div(cm.tp as f64, (cm.tp + cm.fn_) as f64);
        let f1 = safe_div(2.0 * precision * recall, precision + recall);
        let roc_auc = roc_auc_score(y_true, y_proba);

        Self {
            confusion: cm,
            accuracy,
            precision,
            recall,
            f1,
            roc_auc,
        }
    }

    /// Summary block with the headline numbers.
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str("Evaluation Metrics\n");
        s.push_str("==================\n\n");
        s.push_str(&self.confusion.display());
        s.push_str("\nMetrics:\n");
        s.push_str(&format!("  Accuracy: {:.4}\n", self.accuracy));
        s.push_str(&format!("  F1 Score: {:.4}\n", self.f1));
        s.push_str(&format!("  ROC-AUC:  {:.4}\n", self.roc_auc));
        s
    }
}

fn safe_div(num: f64, denom: f64) -> f64 {
    if denom < 1e-10 {
        0.0
    } else {
        num / denom
    }
}

/// Area under the ROC curve via the trapezoid rule, tie-aware.
pub fn roc_auc_score(y_true: &Array1<f64>, y_proba: &Array1<f64>) -> f64 {
    let n = y_true.len();

    let mut pairs: Vec<(f64, bool)> = y_proba
        .iter()
        .zip(y_true.iter())
        .map(|(&p, &t)| (p, t >= 0.5))
        .collect();

    // Sort by score descending
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());

    let n_pos = pairs.iter().filter(|(_, t)| *t).count() as f64;
    let n_neg = pairs.iter().filter(|(_, t)| !*t).count() as f64;

    if n_pos < 1e-10 || n_neg < 1e-10 {
        return 0.5;
    }

    let mut tpr_prev = 0.0;
    let mut fpr_prev = 0.0;
    let mut auc = 0.0;
    let mut tp = 0.0;
    let mut fp = 0.0;

    let mut i = 0;
    while i < n {
        // Consume all points sharing this score so ties contribute one
        // trapezoid
        let score = pairs[i].0;
        let mut j = i;
        while j < n && (pairs[j].0 - score).abs() < 1e-10 {
            if pairs[j].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            j += 1;
        }

        let tpr = tp / n_pos;
        let fpr = fp / n_neg;

        auc += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;

        tpr_prev = tpr;
        fpr_prev = fpr;
        i = j;
    }

    auc
}

/// Per-class precision/recall/F1/support table with macro and weighted
/// averages.
pub fn classification_report(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> String {
    let cm = ConfusionMatrix::from_predictions(y_true, y_pred);

    // Class 1 treats churn as positive; class 0 swaps the roles.
    let p1 = safe_div(cm.tp as f64, (cm.tp + cm.fp) as f64);
    let r1 = safe_div(cm.tp as f64, (cm.tp + cm.fn_) as f64);
    let f1_1 = safe_div(2.0 * p1 * r1, p1 + r1);
    let support1 = cm.tp + cm.fn_;

    let p0 = safe_div(cm.tn as f64, (cm.tn + cm.fn_) as f64);
    let r0 = safe_div(cm.tn as f64, (cm.tn + cm.fp) as f64);
    let f1_0 = safe_div(2.0 * p0 * r0, p0 + r0);
    let support0 = cm.tn + cm.fp;

    let total = cm.total();
    let accuracy = safe_div((cm.tp + cm.tn) as f64, total as f64);

    let macro_p = (p0 + p1) / 2.0;
    let macro_r = (r0 + r1) / 2.0;
    let macro_f1 = (f1_0 + f1_1) / 2.0;

    let w0 = support0 as f64 / total.max(1) as f64;
    let w1 = support1 as f64 / total.max(1) as f64;
    let weighted_p = p0 * w0 + p1 * w1;
    let weighted_r = r0 * w0 + r1 * w1;
    let weighted_f1 = f1_0 * w0 + f1_1 * w1;

    let mut s = String::new();
    s.push_str(&format!(
        "{:>14} {:>9} {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score", "support"
    ));
    s.push_str(&format!(
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        "0", p0, r0, f1_0, support0
    ));
    s.push_str(&format!(
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n\n",
        "1", p1, r1, f1_1, support1
    ));
    s.push_str(&format!(
        "{:>14} {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy", "", "", accuracy, total
    ));
    s.push_str(&format!(
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        "macro avg", macro_p, macro_r, macro_f1, total
    ));
    s.push_str(&format!(
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        "weighted avg", weighted_p, weighted_r, weighted_f1, total
    ));

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix_counts() {
        let y_true = Array1::from_vec(vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let y_pred = Array1::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);

        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);

        assert_eq!(cm.tp, 2);
        assert_eq!(cm.tn, 2);
        assert_eq!(cm.fp, 1);
        assert_eq!(cm.fn_, 1);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_perfect_predictions() {
        let y_true = Array1::from_vec(vec![1.0, 0.0, 1.0, 0.0]);
        let y_proba = Array1::from_vec(vec![0.9, 0.1, 0.8, 0.2]);
        let y_pred = y_proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 });

        let metrics = ClassificationMetrics::from_scores(&y_true, &y_pred, &y_proba);

        assert!((metrics.accuracy - 1.0).abs() < 1e-10);
        assert!((metrics.f1 - 1.0).abs() < 1e-10);
        assert!((metrics.roc_auc - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_f1_balances_precision_and_recall() {
        let y_true = Array1::from_vec(vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let y_pred = Array1::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
        let y_proba = y_pred.clone();

        let metrics = ClassificationMetrics::from_scores(&y_true, &y_pred, &y_proba);

        // Precision = 2/3, Recall = 2/3, F1 = 2/3
        assert!((metrics.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics.recall - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics.f1 - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_auc_random_scores_is_half() {
        // Equal scores for every sample: chance-level ranking
        let y_true = Array1::from_vec(vec![1.0, 0.0, 1.0, 0.0]);
        let y_proba = Array1::from_vec(vec![0.5, 0.5, 0.5, 0.5]);

        let auc = roc_auc_score(&y_true, &y_proba);
        assert!((auc - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_auc_single_class_defaults_to_half() {
        let y_true = Array1::from_vec(vec![1.0, 1.0]);
        let y_proba = Array1::from_vec(vec![0.7, 0.9]);
        assert!((roc_auc_score(&y_true, &y_proba) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_classification_report_shape() {
        let y_true = Array1::from_vec(vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let y_pred = Array1::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);

        let report = classification_report(&y_true, &y_pred);

        assert!(report.contains("precision"));
        assert!(report.contains("macro avg"));
        assert!(report.contains("weighted avg"));
        assert!(report.contains("accuracy"));
    }
}
