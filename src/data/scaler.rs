//! Standard scaling (zero mean, unit variance per feature).
//!
//! The scaler is fit once on training data and must be reapplied
//! identically at inference time; it is serialized inside the model bundle
//! so the serving side always uses the exact statistics the model was
//! trained against.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for scaler operations
#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("Scaler has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: scaler fitted on {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Per-feature mean/std transform, immutable after fit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Option<Array1<f64>>,
    stds: Option<Array1<f64>>,
}

impl StandardScaler {
    /// Create an unfitted scaler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn per-column mean and standard deviation from `x`.
    pub fn fit(&mut self, x: &Array2<f64>) {
        let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
        let stds = x.std_axis(Axis(0), 0.0);

        self.means = Some(means);
        self.stds = Some(stds);
    }

    /// Number of features the scaler was fitted on.
    pub fn n_features(&self) -> Option<usize> {
        self.means.as_ref().map(Array1::len)
    }

    /// Standardize a matrix column-wise. Columns with near-zero spread map
    /// to 0.0.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let means = self.means.as_ref().ok_or(ScalerError::NotFitted)?;
        let stds = self.stds.as_ref().ok_or(ScalerError::NotFitted)?;

        if x.ncols() != means.len() {
            return Err(ScalerError::DimensionMismatch {
                expected: means.len(),
                got: x.ncols(),
            });
        }

        let mut result = Array2::zeros(x.raw_dim());
        for (j, mut col) in result.columns_mut().into_iter().enumerate() {
            let mean = means[j];
            let std = stds[j];
            for (i, val) in col.iter_mut().enumerate() {
                if std > 1e-10 {
                    *val = (x[[i, j]] - mean) / std;
                } else {
                    *val = 0.0;
                }
            }
        }

        Ok(result)
    }

    /// Standardize a single feature row.
    pub fn transform_row(&self, row: &Array1<f64>) -> Result<Array1<f64>, ScalerError> {
        let means = self.means.as_ref().ok_or(ScalerError::NotFitted)?;
        let stds = self.stds.as_ref().ok_or(ScalerError::NotFitted)?;

        if row.len() != means.len() {
            return Err(ScalerError::DimensionMismatch {
                expected: means.len(),
                got: row.len(),
            });
        }

        let scaled = Array1::from_iter(row.iter().enumerate().map(|(j, &v)| {
            if stds[j] > 1e-10 {
                (v - means[j]) / stds[j]
            } else {
                0.0
            }
        }));

        Ok(scaled)
    }
}
