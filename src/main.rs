//! Telco churn pipeline entry point.
//!
//! Subcommands cover the pipeline end to end:
//!
//! ```bash
//! cargo run -- train --data input/WA_Fn-UseC_-Telco-Customer-Churn.csv --save
//! cargo run -- serve --bundle models/telco_logistic_regression.json
//! cargo run -- predict --bundle models/telco_logistic_regression.json --tenure 2 --monthly 12
//! cargo run -- dashboard --tenure 2 --monthly 12
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use telco_churn::dashboard::{DashboardOptions, Layout};
use telco_churn::{config, dashboard, DataLoader, PipelineConfig, Predictor};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "telco_churn")]
#[command(about = "Telco customer churn prediction pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the churn model and report held-out metrics
    Train {
        /// Path to the raw telco CSV
        #[arg(short, long, default_value = config::DATA_PATH)]
        data: PathBuf,

        /// Where to write the model bundle
        #[arg(short, long, default_value = config::BUNDLE_PATH)]
        bundle_out: PathBuf,

        /// Persist the bundle after training
        #[arg(short, long)]
        save: bool,
    },

    /// Serve predictions over HTTP from a saved bundle
    Serve {
        /// Path to the model bundle
        #[arg(short, long, default_value = config::BUNDLE_PATH)]
        bundle: PathBuf,

        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },

    /// Score a single customer locally, without HTTP
    Predict {
        /// Path to the model bundle
        #[arg(short, long, default_value = config::BUNDLE_PATH)]
        bundle: PathBuf,

        /// Tenure in months
        #[arg(short, long)]
        tenure: f64,

        /// Monthly charge in dollars
        #[arg(short, long)]
        monthly: f64,

        /// Tech support is active
        #[arg(long)]
        tech_support: bool,
    },

    /// Query a prediction service and render the result
    Dashboard {
        /// Base URL of the prediction service
        #[arg(long, default_value = config::DEV_API)]
        api: String,

        /// Tenure in months, 0-120
        #[arg(short, long)]
        tenure: u32,

        /// Monthly charge in dollars
        #[arg(short, long)]
        monthly: f64,

        /// Tech support is active
        #[arg(long)]
        tech_support: bool,

        /// Rendering style
        #[arg(long, value_enum, default_value = "simple")]
        layout: LayoutArg,

        /// Use the legacy query-string transport for the production
        /// backend
        #[arg(long)]
        production: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Simple,
    Wide,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Simple => Layout::Simple,
            LayoutArg::Wide => Layout::Wide,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            bundle_out,
            save,
        } => {
            info!("Training churn model from {:?}", data);

            let pipeline_config = PipelineConfig {
                data_path: data.clone(),
                bundle_path: bundle_out,
                save_bundle: save,
                ..PipelineConfig::default()
            };

            let records = DataLoader::load_customers(&data)?;
            info!("Loaded {} customer rows", records.len());

            let outcome = telco_churn::train(&records, &pipeline_config)?;

            println!("\n{}", outcome.evaluation.report());
            println!("{}", outcome.report);

            if outcome.dropped_rows > 0 {
                println!(
                    "Note: {} rows dropped for unparseable TotalCharges",
                    outcome.dropped_rows
                );
            }

            match outcome.bundle_path {
                Some(path) => println!("Bundle saved to {:?}", path),
                None => warn!("Bundle was not saved; pass --save to persist it"),
            }
        }

        Commands::Serve { bundle, addr } => {
            let predictor = Predictor::from_path(&bundle)?;
            telco_churn::api::serve(predictor, addr).await?;
        }

        Commands::Predict {
            bundle,
            tenure,
            monthly,
            tech_support,
        } => {
            let predictor = Predictor::from_path(&bundle)?;

            let features = HashMap::from([
                ("tenure".to_string(), tenure),
                ("MonthlyCharges".to_string(), monthly),
                ("TechSupport_yes".to_string(), f64::from(u8::from(tech_support))),
            ]);

            let probability = predictor.predict(&features)?;

            println!("Churn probability: {:.4}", probability);
            println!(
                "Prediction: {}",
                if probability >= 0.5 {
                    "likely to churn"
                } else {
                    "unlikely to churn"
                }
            );
        }

        Commands::Dashboard {
            api,
            tenure,
            monthly,
            tech_support,
            layout,
            production,
        } => {
            let options = DashboardOptions {
                api_base: api,
                tenure,
                monthly,
                techsupport: tech_support,
                layout: layout.into(),
                use_production: production,
            };

            dashboard::run(&options).await?;
        }
    }

    Ok(())
}
