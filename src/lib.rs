//! # Telco Churn - Customer Churn Prediction
//!
//! End-to-end pipeline for predicting telecom customer churn: clean and
//! encode the public telco CSV, fit a logistic regression baseline,
//! persist the fitted model together with its scaler and feature schema
//! as one bundle, and serve single-row predictions over HTTP to a
//! dashboard client.
//!
//! ## Modules
//!
//! - `config` - constants and the pipeline configuration object
//! - `schema` - the feature order contract shared by trainer and predictor
//! - `data` - CSV loading, cleaning, one-hot encoding, scaling
//! - `models` - logistic regression and the persisted bundle
//! - `metrics` - held-out evaluation metrics
//! - `train` - stratified split, fit, evaluate, persist
//! - `predict` - single-row scoring against a loaded bundle
//! - `api` - the axum prediction service and its reqwest client
//! - `dashboard` - the configurable dashboard front-end

pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod metrics;
pub mod models;
pub mod predict;
pub mod schema;
pub mod train;

pub use api::client::{ChurnApiClient, PredictionPayload};
pub use config::PipelineConfig;
pub use data::loader::DataLoader;
pub use data::preprocess::{preprocess, Preprocessed};
pub use data::scaler::StandardScaler;
pub use data::types::CustomerRecord;
pub use metrics::classification::ClassificationMetrics;
pub use models::bundle::ModelBundle;
pub use models::logistic::LogisticRegression;
pub use predict::Predictor;
pub use schema::FeatureSchema;
pub use train::{train, TrainOutcome};
