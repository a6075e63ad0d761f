//! HTTP surface: the prediction service and its client.

pub mod client;
pub mod error;
pub mod server;

pub use client::{ChurnApiClient, PredictionPayload};
pub use error::{ApiError, ApiResult};
pub use server::{create_router, serve, AppState};
