//! API error types

use thiserror::Error;

/// Errors that can occur when calling the prediction API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
