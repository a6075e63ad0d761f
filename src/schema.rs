//! Feature schema shared between training and serving.
//!
//! The order and set of feature names a model expects is the one contract
//! the trainer and the predictor must agree on. It lives here as a single
//! value, travels inside the persisted bundle, and is checked against the
//! compiled-in schema when a bundle is loaded, so train/serve drift fails
//! at startup instead of scoring silently wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema mismatch between a loaded bundle and the running build.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("bundle was trained with features {bundle:?}, but this build expects {expected:?}")]
    Mismatch {
        bundle: Vec<String>,
        expected: Vec<String>,
    },
}

/// Ordered list of feature names a model consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from an ordered list of feature names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The fixed production schema for the telco churn model.
    ///
    /// `TechSupport_yes` is the one-hot indicator produced by encoding the
    /// `TechSupport` column with its first level dropped.
    pub fn telco() -> Self {
        Self::new(["tenure", "MonthlyCharges", "TechSupport_yes"])
    }

    /// Feature names in model order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a feature name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Check that this schema matches `expected` exactly (names and order).
    pub fn check_consistency(&self, expected: &FeatureSchema) -> Result<(), SchemaError> {
        if self.names != expected.names {
            return Err(SchemaError::Mismatch {
                bundle: self.names.clone(),
                expected: expected.names.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telco_schema_order() {
        let schema = FeatureSchema::telco();
        assert_eq!(
            schema.names(),
            &["tenure", "MonthlyCharges", "TechSupport_yes"]
        );
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_index_of() {
        let schema = FeatureSchema::telco();
        assert_eq!(schema.index_of("tenure"), Some(0));
        assert_eq!(schema.index_of("TechSupport_yes"), Some(2));
        assert_eq!(schema.index_of("Contract_two year"), None);
    }

    #[test]
    fn test_consistency_check_rejects_drift() {
        let compiled = FeatureSchema::telco();
        let drifted = FeatureSchema::new(["tenure", "MonthlyCharges", "TechSupport_no"]);

        assert!(compiled.check_consistency(&compiled).is_ok());

        let err = drifted.check_consistency(&compiled).unwrap_err();
        assert!(err.to_string().contains("TechSupport_no"));
        assert!(err.to_string().contains("TechSupport_yes"));
    }

    #[test]
    fn test_reordered_schema_is_a_mismatch() {
        let compiled = FeatureSchema::telco();
        let reordered = FeatureSchema::new(["MonthlyCharges", "tenure", "TechSupport_yes"]);
        assert!(reordered.check_consistency(&compiled).is_err());
    }
}
