//! Health command

use anyhow::Result;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_status, format_loaded, print_warning, OutputFormat};

/// Row for the artifact status table
#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "Artifact")]
    artifact: String,
    #[tabled(rename = "Loaded")]
    loaded: String,
}

/// Query and render the service health report
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&health)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("Status: {}", color_status(&health.status));

            let rows = vec![
                ArtifactRow {
                    artifact: "scaler".to_string(),
                    loaded: format_loaded(health.scaler),
                },
                ArtifactRow {
                    artifact: "logistic_regression".to_string(),
                    loaded: format_loaded(health.logistic_regression),
                },
                ArtifactRow {
                    artifact: "decision_tree".to_string(),
                    loaded: format_loaded(health.decision_tree),
                },
            ];

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if !health.models_loaded {
                print_warning("Service is not ready; prediction endpoints will refuse requests");
            }
        }
    }

    Ok(())
}
