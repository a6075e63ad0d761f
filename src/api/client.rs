//! Prediction API client.
//!
//! One client serves both historical transports: the JSON POST used by the
//! development service, and the legacy query-string GET for the serverless
//! production deployment that cannot parse JSON bodies and needs a long
//! timeout while it cold-starts. The GET path is kept for that backend
//! only; nothing in the default flow depends on it.

use super::error::ApiResult;
use crate::config::{GET_TIMEOUT, POST_TIMEOUT};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// The three inputs a dashboard collects. Transient, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPayload {
    /// Months the customer has been subscribed
    pub tenure: u32,
    /// Monthly charge in dollars
    pub monthly: f64,
    /// 1 when tech support is active
    pub techsupport: u8,
}

/// Client for the churn prediction service
#[derive(Debug, Clone)]
pub struct ChurnApiClient {
    client: Client,
    base_url: String,
}

impl ChurnApiClient {
    /// Create a client against a service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Call `POST /predict` with a JSON payload and return the JSON
    /// response body.
    pub async fn fetch_prediction(&self, payload: &PredictionPayload) -> ApiResult<serde_json::Value> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .timeout(POST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Call the production service over the query-string GET transport and
    /// return the raw response body.
    pub async fn fetch_prediction_from_production(
        &self,
        payload: &PredictionPayload,
    ) -> ApiResult<String> {
        let url = Self::production_url(&self.base_url, payload);

        let response = self
            .client
            .get(&url)
            .timeout(GET_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    fn production_url(base: &str, payload: &PredictionPayload) -> String {
        format!(
            "{}?tenure={}&monthly={}&techsupport={}",
            base, payload.tenure, payload.monthly, payload.techsupport
        )
    }
}
