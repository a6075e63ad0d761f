//! Training pipeline: preprocess, split, fit, evaluate, persist.

use crate::config::PipelineConfig;
use crate::data::preprocess::preprocess;
use crate::data::types::CustomerRecord;
use crate::metrics::classification::{classification_report, ClassificationMetrics};
use crate::models::bundle::ModelBundle;
use crate::models::logistic::LogisticRegression;
use crate::schema::FeatureSchema;
use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

/// Everything a training run produces.
#[derive(Debug)]
pub struct TrainOutcome {
    /// The fitted bundle, whether or not it was persisted
    pub bundle: ModelBundle,
    /// Held-out metrics
    pub evaluation: ClassificationMetrics,
    /// Per-class report text
    pub report: String,
    /// Where the bundle was written, `None` when saving was not requested
    pub bundle_path: Option<PathBuf>,
    /// Rows lost to unparseable `TotalCharges`
    pub dropped_rows: usize,
}

/// Split sample indices into train/test, stratified on the label.
///
/// Each class is shuffled with a seeded RNG and contributes the same
/// fraction to the test split, so class balance survives the split and
/// repeated runs produce identical partitions.
pub fn stratified_split(y: &Array1<f64>, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut positives: Vec<usize> = Vec::new();
    let mut negatives: Vec<usize> = Vec::new();
    for (i, &label) in y.iter().enumerate() {
        if label >= 0.5 {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }

    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [&mut negatives, &mut positives] {
        class.shuffle(&mut rng);
        let n_test = ((class.len() as f64) * test_size).round() as usize;
        test.extend_from_slice(&class[..n_test]);
        train.extend_from_slice(&class[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    (train, test)
}

fn take_rows(x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
    let xs = x.select(Axis(0), indices);
    let ys = Array1::from_iter(indices.iter().map(|&i| y[i]));
    (xs, ys)
}

/// Run the full training pipeline on raw customer rows.
pub fn train(records: &[CustomerRecord], config: &PipelineConfig) -> Result<TrainOutcome> {
    let schema = FeatureSchema::telco();
    let prepared = preprocess(records, &schema)?;

    let (train_idx, test_idx) = stratified_split(&prepared.y, config.test_size, config.seed);
    info!(
        "Split {} rows into {} train / {} test (stratified, seed {})",
        prepared.y.len(),
        train_idx.len(),
        test_idx.len(),
        config.seed
    );

    let (x_train, y_train) = take_rows(&prepared.x, &prepared.y, &train_idx);
    let (x_test, y_test) = take_rows(&prepared.x, &prepared.y, &test_idx);

    // L2 strength equivalent to an inverse-regularization constant C over
    // the per-sample loss.
    let l2_alpha = 1.0 / (config.c_value * x_train.nrows().max(1) as f64);
    let mut model = LogisticRegression::new(
        config.learning_rate,
        config.max_iter,
        config.tolerance,
        l2_alpha,
    );
    model.fit(&x_train, &y_train);

    let y_proba = model.predict_proba(&x_test)?;
    let y_pred = y_proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 });

    let evaluation = ClassificationMetrics::from_scores(&y_test, &y_pred, &y_proba);
    let report = classification_report(&y_test, &y_pred);

    let bundle = ModelBundle::new(model, prepared.scaler, schema);

    let bundle_path = if config.save_bundle {
        bundle.save(&config.bundle_path)?;
        info!("Saved bundle to {:?}", config.bundle_path);
        Some(config.bundle_path.clone())
    } else {
        // Skipped when the flag is unset; callers must check bundle_path.
        info!("save_bundle not set; bundle kept in memory only");
        None
    };

    Ok(TrainOutcome {
        bundle,
        evaluation,
        report,
        bundle_path,
        dropped_rows: prepared.dropped_rows,
    })
}
