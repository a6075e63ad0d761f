//! The persisted model bundle.
//!
//! A bundle pairs the fitted classifier with the scaler it was trained
//! against, plus the feature schema both were fit on. It is the unit of
//! persistence and deployment: written once by the trainer, read-only
//! thereafter, loaded whole at process start.

use super::logistic::LogisticRegression;
use crate::data::scaler::StandardScaler;
use crate::schema::FeatureSchema;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fitted model, fitted scaler, and the schema they share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Fitted classifier
    pub model: LogisticRegression,
    /// Scaler fitted on the same training columns
    pub scaler: StandardScaler,
    /// Feature order both sides agreed on at training time
    pub schema: FeatureSchema,
}

impl ModelBundle {
    /// Pair a fitted model and scaler under a schema.
    pub fn new(model: LogisticRegression, scaler: StandardScaler, schema: FeatureSchema) -> Self {
        Self {
            model,
            scaler,
            schema,
        }
    }

    /// Save the bundle as pretty-printed JSON, creating parent directories
    /// as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write bundle: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Load a bundle from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read bundle: {:?}", path.as_ref()))?;
        let bundle: ModelBundle = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse bundle: {:?}", path.as_ref()))?;
        Ok(bundle)
    }

    /// Load a bundle and verify its schema matches `expected`.
    ///
    /// This is the startup-time drift check: a bundle trained against a
    /// different feature list must fail here, not score garbage later.
    pub fn load_checked<P: AsRef<Path>>(path: P, expected: &FeatureSchema) -> Result<Self> {
        let bundle = Self::load(path)?;
        bundle
            .schema
            .check_consistency(expected)
            .context("Bundle schema does not match this build")?;
        Ok(bundle)
    }
}
