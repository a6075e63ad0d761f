//! Pipeline configuration.
//!
//! Every tunable of the pipeline lives here as a source-level constant,
//! gathered into a [`PipelineConfig`] that is built once at startup and
//! passed by reference to the training and serving code.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the raw telco dataset.
pub const DATA_PATH: &str = "input/WA_Fn-UseC_-Telco-Customer-Churn.csv";

/// Default location of the persisted model bundle.
pub const BUNDLE_PATH: &str = "models/telco_logistic_regression.json";

/// Fraction of rows held out for evaluation.
pub const TEST_SIZE: f64 = 0.20;

/// Inverse regularization strength (smaller = stronger L2 penalty).
pub const C_VALUE: f64 = 1.0;

/// Iteration cap for the gradient-descent fit.
pub const MAX_ITER: usize = 1000;

/// Gradient-descent step size.
pub const LEARNING_RATE: f64 = 0.1;

/// Convergence tolerance on the change in log loss.
pub const TOLERANCE: f64 = 1e-7;

/// Seed for the stratified shuffle, fixed for reproducibility.
pub const RANDOM_SEED: u64 = 42;

/// Local development prediction service.
pub const DEV_API: &str = "http://127.0.0.1:8000";

/// Serverless production deployment. Only speaks the query-string GET
/// transport and needs a long timeout for cold starts.
pub const PROD_API: &str = "https://predictingforjay.azurewebsites.net/api/predict";

/// Timeout for JSON POST requests against the dev service.
pub const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for query-string GET requests against the production service.
pub const GET_TIMEOUT: Duration = Duration::from_secs(20);

/// Training and persistence settings, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path to the raw CSV dataset
    pub data_path: PathBuf,
    /// Where to write the model bundle when `save_bundle` is set
    pub bundle_path: PathBuf,
    /// Held-out test fraction
    pub test_size: f64,
    /// Inverse regularization strength
    pub c_value: f64,
    /// Gradient-descent iteration cap
    pub max_iter: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// Convergence tolerance
    pub tolerance: f64,
    /// Shuffle seed
    pub seed: u64,
    /// Persist the bundle after training. When unset the bundle is
    /// silently not saved; callers must check `TrainOutcome::bundle_path`.
    pub save_bundle: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_PATH),
            bundle_path: PathBuf::from(BUNDLE_PATH),
            test_size: TEST_SIZE,
            c_value: C_VALUE,
            max_iter: MAX_ITER,
            learning_rate: LEARNING_RATE,
            tolerance: TOLERANCE,
            seed: RANDOM_SEED,
            save_bundle: false,
        }
    }
}
