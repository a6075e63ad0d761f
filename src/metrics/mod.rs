//! Model evaluation metrics.

pub mod classification;

pub use classification::{classification_report, ClassificationMetrics, ConfusionMatrix};
