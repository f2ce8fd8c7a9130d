//! Predict and batch commands

use anyhow::{Context, Result};
use tabled::Tabled;

use crate::client::{ApiClient, BatchPredictionResponse, FeatureInput, PredictionResponse};
use crate::output::{format_probability, format_risk, print_success, OutputFormat};

/// Row for the prediction table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Row for the batch results table
#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "LR Risk")]
    lr_risk: String,
    #[tabled(rename = "LR Conf")]
    lr_confidence: String,
    #[tabled(rename = "DT Risk")]
    dt_risk: String,
    #[tabled(rename = "DT Conf")]
    dt_confidence: String,
}

fn prediction_rows(response: &PredictionResponse) -> Vec<PredictionRow> {
    [&response.logistic_regression, &response.decision_tree]
        .iter()
        .map(|p| PredictionRow {
            model: p.model_name.clone(),
            class: p.prediction.to_string(),
            risk: format_risk(p.prediction),
            confidence: format_probability(p.probability),
        })
        .collect()
}

/// Request a combined prediction for one feature vector
pub async fn predict(client: &ApiClient, features: FeatureInput, format: OutputFormat) -> Result<()> {
    let response: PredictionResponse = client.post("predict", &features).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let table = tabled::Table::new(prediction_rows(&response))
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

/// Request predictions for a JSON file holding an array of feature vectors
pub async fn predict_batch(client: &ApiClient, file: &str, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read batch file {}", file))?;
    let items: Vec<FeatureInput> =
        serde_json::from_str(&content).context("Batch file must be a JSON array of feature objects")?;

    let response: BatchPredictionResponse = client.post("predict/batch", &items).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows: Vec<BatchRow> = response
                .results
                .iter()
                .enumerate()
                .map(|(index, r)| BatchRow {
                    index: index.to_string(),
                    age: format!("{}", r.input_features.age),
                    lr_risk: format_risk(r.logistic_regression.prediction),
                    lr_confidence: format_probability(r.logistic_regression.probability),
                    dt_risk: format_risk(r.decision_tree.prediction),
                    dt_confidence: format_probability(r.decision_tree.probability),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            print_success(&format!("{} predictions", response.count));
        }
    }

    Ok(())
}
