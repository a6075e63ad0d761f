//! Dataset loading, cleaning, and scaling.

pub mod loader;
pub mod preprocess;
pub mod scaler;
pub mod types;

pub use loader::DataLoader;
pub use preprocess::{preprocess, Preprocessed};
pub use scaler::StandardScaler;
pub use types::CustomerRecord;
