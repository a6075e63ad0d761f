//! HTTP prediction service.
//!
//! ## Endpoints
//!
//! - `POST /predict` - JSON body `{"tenure", "monthly", "techsupport"}`
//! - `GET /predict` - same fields as query parameters (legacy transport
//!   for the serverless deployment that cannot parse JSON bodies)
//! - `GET /health` - health check
//!
//! The loaded predictor is read-only after startup, so handlers share it
//! through an `Arc` without locking.

use crate::predict::{PredictError, Predictor};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    predictor: Arc<Predictor>,
}

impl AppState {
    /// Wrap a loaded predictor for serving.
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

/// Prediction request, identical for the JSON and query-string transports
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Months subscribed
    pub tenure: f64,
    /// Monthly charge
    pub monthly: f64,
    /// 1 when tech support is active
    pub techsupport: u8,
}

/// Prediction response; `prediction` is the thresholded class label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// 1 = likely to churn
    pub prediction: u8,
    /// Positive-class probability
    pub probability: f64,
    /// Identifier of the serving model
    pub model: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Map the wire payload onto schema feature names. The request shape and
/// the model contract meet only here.
fn feature_map(request: &PredictRequest) -> HashMap<String, f64> {
    HashMap::from([
        ("tenure".to_string(), request.tenure),
        ("MonthlyCharges".to_string(), request.monthly),
        ("TechSupport_yes".to_string(), f64::from(request.techsupport)),
    ])
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler).get(predict_query_handler))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(predictor: Predictor, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(AppState::new(predictor));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Prediction service listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    score(&state, &request)
}

/// Legacy query-string transport.
async fn predict_query_handler(
    State(state): State<AppState>,
    Query(request): Query<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    score(&state, &request)
}

fn score(
    state: &AppState,
    request: &PredictRequest,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let features = feature_map(request);

    match state.predictor.predict(&features) {
        Ok(probability) => Ok(Json(PredictResponse {
            prediction: u8::from(probability >= 0.5),
            probability,
            model: "telco_logistic_regression".to_string(),
        })),
        Err(err @ PredictError::MissingFeature(_)) => {
            error!("Rejected prediction request: {}", err);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
        Err(err) => {
            error!("Prediction failed: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_map_covers_the_schema() {
        let request = PredictRequest {
            tenure: 2.0,
            monthly: 12.0,
            techsupport: 1,
        };

        let features = feature_map(&request);
        let schema = crate::schema::FeatureSchema::telco();

        for name in schema.names() {
            assert!(features.contains_key(name), "missing {name}");
        }
        assert_eq!(features["TechSupport_yes"], 1.0);
    }

    #[test]
    fn test_request_accepts_integer_fields() {
        // Dashboards send whole numbers for tenure and monthly
        let request: PredictRequest =
            serde_json::from_str(r#"{"tenure": 2, "monthly": 12, "techsupport": 0}"#).unwrap();
        assert_eq!(request.tenure, 2.0);
        assert_eq!(request.monthly, 12.0);
        assert_eq!(request.techsupport, 0);
    }
}
