//! Single-row churn scoring against a loaded bundle.
//!
//! A [`Predictor`] is constructed once at process start from a bundle and
//! passed by reference wherever scoring happens; there is no hidden global
//! and no reload path. A new model means a new process. The bundle is
//! never mutated after construction, so sharing a predictor across
//! threads needs no locking.

use crate::data::scaler::ScalerError;
use crate::models::bundle::ModelBundle;
use crate::models::logistic::ModelError;
use crate::schema::FeatureSchema;
use anyhow::Result;
use ndarray::Array1;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors for single-row prediction
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error(transparent)]
    Scaler(#[from] ScalerError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Scores named feature values against an immutable bundle.
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: ModelBundle,
}

impl Predictor {
    /// Wrap an already-loaded bundle. Tests use this to substitute a fake
    /// bundle without touching the filesystem.
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    /// Load a bundle from disk and verify its schema against the compiled
    /// production schema.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bundle = ModelBundle::load_checked(&path, &FeatureSchema::telco())?;
        info!("Loaded model bundle from {:?}", path.as_ref());
        Ok(Self::new(bundle))
    }

    /// The feature order this predictor expects.
    pub fn schema(&self) -> &FeatureSchema {
        &self.bundle.schema
    }

    /// Churn probability for one customer, given raw (unscaled) feature
    /// values keyed by schema name.
    ///
    /// Values are reordered to the schema, scaled with the bundled scaler,
    /// and scored. Any required feature absent from the map is an error
    /// naming that feature. Value ranges are not validated beyond what the
    /// numeric transform enforces.
    pub fn predict(&self, features: &HashMap<String, f64>) -> Result<f64, PredictError> {
        let names = self.bundle.schema.names();
        let mut row = Array1::zeros(names.len());

        for (i, name) in names.iter().enumerate() {
            row[i] = *features
                .get(name)
                .ok_or_else(|| PredictError::MissingFeature(name.clone()))?;
        }

        let scaled = self.bundle.scaler.transform_row(&row)?;
        let prob = self.bundle.model.predict_proba_row(&scaled)?;

        info!("Churn probability: {:.4}", prob);
        Ok(prob)
    }
}
