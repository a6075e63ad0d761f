//! Dashboard front-end for the prediction service.
//!
//! One configurable component covers both historical dashboard variants;
//! the minimal one and the branded wide one differ only in layout.
//! Collects the three inputs, calls the service, and renders either the
//! result (a churn label plus the raw response body for inspection) or a
//! visible error line. Failures are never retried and never leave a stale
//! result on screen.

use crate::api::client::{ChurnApiClient, PredictionPayload};
use anyhow::{bail, Result};

/// Input bounds enforced by the dashboard widgets.
const MAX_TENURE: u32 = 120;
const MAX_MONTHLY: f64 = 1000.0;

/// Rendering style for the two dashboard variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Minimal result view
    Simple,
    /// Branded view with header and sections
    Wide,
}

/// Everything a dashboard run needs.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Base URL of the prediction service
    pub api_base: String,
    /// Tenure in months, 0-120
    pub tenure: u32,
    /// Monthly charge in dollars
    pub monthly: f64,
    /// Whether tech support is active
    pub techsupport: bool,
    /// Rendering style
    pub layout: Layout,
    /// Use the legacy query-string transport against the production
    /// backend
    pub use_production: bool,
}

/// Validate inputs, call the endpoint, and render the outcome.
pub async fn run(options: &DashboardOptions) -> Result<()> {
    if options.tenure > MAX_TENURE {
        bail!("tenure must be between 0 and {} months", MAX_TENURE);
    }
    if !(0.0..=MAX_MONTHLY).contains(&options.monthly) {
        bail!("monthly charge must be between 0 and {}", MAX_MONTHLY);
    }

    let payload = PredictionPayload {
        tenure: options.tenure,
        monthly: options.monthly,
        techsupport: u8::from(options.techsupport),
    };

    render_header(options.layout);

    let client = ChurnApiClient::new(options.api_base.clone());

    if options.use_production {
        match client.fetch_prediction_from_production(&payload).await {
            Ok(body) => render_raw(options.layout, &body),
            Err(e) => render_error(&e.to_string()),
        }
        return Ok(());
    }

    match client.fetch_prediction(&payload).await {
        Ok(data) => render_result(options.layout, &data),
        Err(e) => render_error(&e.to_string()),
    }

    Ok(())
}

fn render_header(layout: Layout) {
    match layout {
        Layout::Simple => {
            println!("Telco Churn Prediction");
            println!("======================");
        }
        Layout::Wide => {
            println!("==============================================");
            println!("  Ruby Churn Prediction");
            println!("  Helping telecom companies understand");
            println!("  customer behavior");
            println!("==============================================");
        }
    }
}

fn render_result(layout: Layout, data: &serde_json::Value) {
    let prediction = data.get("prediction");

    match layout {
        Layout::Simple => {
            println!("\nResult");
            println!("------");
            match prediction {
                Some(p) => println!("Model prediction: {}", p),
                None => println!("Model prediction: no prediction returned"),
            }
        }
        Layout::Wide => {
            println!("\nPrediction Result");
            println!("-----------------");
            match prediction.and_then(serde_json::Value::as_u64) {
                Some(1) => println!("This customer is likely to churn."),
                Some(_) => println!("This customer is unlikely to churn."),
                None => println!("No prediction returned"),
            }
            println!("\nFull Model Output");
            println!("-----------------");
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
    );
}

fn render_raw(layout: Layout, body: &str) {
    match layout {
        Layout::Simple => println!("\nResult\n------"),
        Layout::Wide => println!("\nPrediction Result\n-----------------"),
    }
    println!("{}", body);
}

fn render_error(message: &str) {
    println!("\nError calling API: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(tenure: u32, monthly: f64) -> DashboardOptions {
        DashboardOptions {
            // Discard port: nothing listens, connections fail fast
            api_base: "http://127.0.0.1:9".to_string(),
            tenure,
            monthly,
            techsupport: false,
            layout: Layout::Simple,
            use_production: false,
        }
    }

    #[tokio::test]
    async fn test_out_of_range_tenure_is_rejected() {
        let err = run(&options(121, 70.0)).await.unwrap_err();
        assert!(err.to_string().contains("tenure"));
    }

    #[tokio::test]
    async fn test_out_of_range_monthly_is_rejected() {
        let err = run(&options(12, 1500.0)).await.unwrap_err();
        assert!(err.to_string().contains("monthly"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_renders_error_without_panicking() {
        // Transport failure is rendered, not propagated
        assert!(run(&options(12, 70.0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_production_endpoint_is_also_caught() {
        let mut opts = options(12, 70.0);
        opts.use_production = true;
        opts.layout = Layout::Wide;
        assert!(run(&opts).await.is_ok());
    }
}
