//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding the three serialized artifacts
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_model_dir() -> String {
    "models".to_string()
}

impl ServiceConfig {
    /// Load configuration from `RISK_`-prefixed environment variables,
    /// falling back to defaults when unset.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("RISK"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            api_port: default_api_port(),
            model_dir: default_model_dir(),
        }))
    }
}
