//! Binary logistic regression for churn classification.
//!
//! Fitted by full-batch gradient descent with an L2 penalty. All
//! hyperparameters are fixed constants supplied by the caller; there is no
//! search. The fit is deterministic: weights start at zero and no
//! randomness enters the loop.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors for model operations
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: model fitted on {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Logistic regression classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    l2_alpha: f64,
    #[serde(skip)]
    cost_history: Vec<f64>,
}

impl LogisticRegression {
    /// Create an unfitted model with fixed hyperparameters.
    pub fn new(learning_rate: f64, max_iter: usize, tolerance: f64, l2_alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            l2_alpha,
            cost_history: Vec::new(),
        }
    }

    /// Numerically stable sigmoid.
    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn sigmoid_array(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(Self::sigmoid)
    }

    /// Binary cross-entropy.
    fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;

        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p_clipped = p.clamp(eps, 1.0 - eps);
                y * p_clipped.ln() + (1.0 - y) * (1.0 - p_clipped).ln()
            })
            .sum::<f64>()
            / n
    }

    /// Fit on a feature matrix and binary label vector using gradient
    /// descent.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) {
        let n_samples = x.nrows() as f64;
        let n_features = x.ncols();

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;

        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid_array(&linear);

            let errors = &predictions - y;
            let dw = x.t().dot(&errors) / n_samples + &(&weights * self.l2_alpha);
            let db = errors.sum() / n_samples;

            weights = &weights - &(&dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let cost = Self::log_loss(y, &predictions);
            self.cost_history.push(cost);

            if iter > 0 {
                let cost_diff = (self.cost_history[iter - 1] - cost).abs();
                if cost_diff < self.tolerance {
                    debug!("Converged at iteration {}", iter);
                    break;
                }
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
    }

    /// Fitted coefficients, if any.
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Fitted intercept, if any.
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Log loss per iteration from the last fit.
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    fn check_width(&self, got: usize) -> Result<&Array1<f64>, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        if got != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got,
            });
        }
        Ok(weights)
    }

    /// Probability of the positive (churn) class for each row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.check_width(x.ncols())?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;

        let linear = x.dot(weights) + bias;
        Ok(Self::sigmoid_array(&linear))
    }

    /// Probability of the positive class for a single row.
    pub fn predict_proba_row(&self, row: &Array1<f64>) -> Result<f64, ModelError> {
        let weights = self.check_width(row.len())?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;

        Ok(Self::sigmoid(row.dot(weights) + bias))
    }

    /// Class labels (0.0 or 1.0) thresholded at 0.5.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 5.0, 5.0, 5.5, 5.5, 6.0, 6.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(100.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-100.0) < 0.01);
        assert!(LogisticRegression::sigmoid(-800.0) >= 0.0);
    }

    #[test]
    fn test_fit_separates_classes() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new(0.5, 1000, 1e-9, 0.0);
        model.fit(&x, &y);

        let predictions = model.predict(&x).unwrap();
        let accuracy: f64 = predictions
            .iter()
            .zip(y.iter())
            .filter(|(&p, &a)| (p - a).abs() < 0.5)
            .count() as f64
            / y.len() as f64;

        assert!(accuracy >= 0.8);
    }

    #[test]
    fn test_probabilities_bounded() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new(0.5, 500, 1e-9, 0.01);
        model.fit(&x, &y);

        let proba = model.predict_proba(&x).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_l2_shrinks_coefficients() {
        let (x, y) = separable_data();

        let mut free = LogisticRegression::new(0.5, 1000, 1e-12, 0.0);
        free.fit(&x, &y);
        let mut penalized = LogisticRegression::new(0.5, 1000, 1e-12, 0.5);
        penalized.fit(&x, &y);

        let norm = |m: &LogisticRegression| {
            m.coefficients()
                .unwrap()
                .iter()
                .map(|c| c * c)
                .sum::<f64>()
                .sqrt()
        };

        assert!(norm(&penalized) < norm(&free));
    }

    #[test]
    fn test_unfitted_model_errors() {
        let model = LogisticRegression::new(0.1, 100, 1e-7, 0.0);
        let x = Array2::zeros((1, 2));
        assert!(matches!(
            model.predict_proba(&x),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_dimension_mismatch_errors() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new(0.5, 100, 1e-9, 0.0);
        model.fit(&x, &y);

        let wide = Array2::zeros((1, 5));
        assert!(matches!(
            model.predict_proba(&wide),
            Err(ModelError::DimensionMismatch {
                expected: 2,
                got: 5
            })
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable_data();

        let mut a = LogisticRegression::new(0.5, 300, 1e-9, 0.01);
        a.fit(&x, &y);
        let mut b = LogisticRegression::new(0.5, 300, 1e-9, 0.01);
        b.fit(&x, &y);

        assert_eq!(a.coefficients().unwrap(), b.coefficients().unwrap());
        assert_eq!(a.intercept(), b.intercept());
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new(0.5, 300, 1e-9, 0.01);
        model.fit(&x, &y);

        let json = serde_json::to_string(&model).unwrap();
        let restored: LogisticRegression = serde_json::from_str(&json).unwrap();

        let a = model.predict_proba(&x).unwrap();
        let b = restored.predict_proba(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_row_matches_matrix_prediction() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new(0.5, 300, 1e-9, 0.01);
        model.fit(&x, &y);

        let matrix = model.predict_proba(&x).unwrap();
        let row = model.predict_proba_row(&x.row(2).to_owned()).unwrap();
        assert!((matrix[2] - row).abs() < 1e-12);
    }
}
