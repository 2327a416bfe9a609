//! watsonx configuration

use serde::{Deserialize, Serialize};
use std::env;

use callgauge_core::{Error, Result};

/// Configuration for the watsonx oracle client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatsonxConfig {
    pub api_key: String,
    pub project_id: String,
    pub iam_url: String,
    pub api_url: String,
    /// Model override for the deep scoring tier
    pub deep_model: Option<String>,
    /// Model override for the light fallback tier
    pub light_model: Option<String>,
}

impl WatsonxConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("WATSONX_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| {
                Error::Configuration(
                    "WATSONX_API_KEY or API_KEY environment variable not found".to_string(),
                )
            })?;

        let project_id = env::var("WATSONX_PROJECT_ID")
            .or_else(|_| env::var("PROJECT_ID"))
            .map_err(|_| {
                Error::Configuration(
                    "WATSONX_PROJECT_ID or PROJECT_ID environment variable not found".to_string(),
                )
            })?;

        let iam_url =
            env::var("IAM_IBM_CLOUD_URL").unwrap_or_else(|_| "iam.cloud.ibm.com".to_string());

        let api_url = env::var("WATSONX_API_URL")
            .unwrap_or_else(|_| "https://us-south.ml.cloud.ibm.com".to_string());

        Ok(Self {
            api_key,
            project_id,
            iam_url,
            api_url,
            deep_model: env::var("WATSONX_DEEP_MODEL").ok(),
            light_model: env::var("WATSONX_LIGHT_MODEL").ok(),
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String, project_id: String) -> Self {
        Self {
            api_key,
            project_id,
            iam_url: "iam.cloud.ibm.com".to_string(),
            api_url: "https://us-south.ml.cloud.ibm.com".to_string(),
            deep_model: None,
            light_model: None,
        }
    }
}
