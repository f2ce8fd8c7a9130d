//! Medical Risk Predictor CLI
//!
//! A command-line client for the risk-service HTTP API: check artifact
//! health and request predictions for one or many feature vectors.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};

use crate::client::FeatureInput;
use crate::output::print_error;

/// Medical Risk Predictor CLI
#[derive(Parser)]
#[command(name = "mrp")]
#[command(author, version, about = "CLI for the Medical Risk Predictor service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via MRP_API_URL env var)
    #[arg(long, env = "MRP_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check service readiness and per-artifact load status
    Health,

    /// Request a prediction from both models for one feature vector
    Predict {
        /// Age of the patient (0-120)
        #[arg(long)]
        age: f64,

        /// Glucose level (0-500)
        #[arg(long)]
        glucose: f64,

        /// Blood pressure (0-200)
        #[arg(long)]
        bp: f64,

        /// Skin thickness (0-100)
        #[arg(long)]
        skin_thickness: f64,

        /// Insulin level (0-1000)
        #[arg(long)]
        insulin: f64,

        /// Body mass index (0-100)
        #[arg(long)]
        bmi: f64,

        /// Diabetes pedigree function (0-3)
        #[arg(long)]
        diabetes_pedigree: f64,

        /// Number of pregnancies (0-20)
        #[arg(long)]
        pregnancies: f64,
    },

    /// Request predictions for a JSON file with an array of feature vectors
    Batch {
        /// Path to the JSON batch file
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let api_client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    let result = match cli.command {
        Commands::Health => health::show_health(&api_client, cli.format).await,
        Commands::Predict {
            age,
            glucose,
            bp,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree,
            pregnancies,
        } => {
            let features = FeatureInput {
                age,
                glucose,
                bp,
                skin_thickness,
                insulin,
                bmi,
                diabetes_pedigree,
                pregnancies,
            };
            predict::predict(&api_client, features, cli.format).await
        }
        Commands::Batch { file } => predict::predict_batch(&api_client, &file, cli.format).await,
    };

    if let Err(err) = &result {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}
