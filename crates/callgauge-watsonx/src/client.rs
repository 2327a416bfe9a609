//! watsonx oracle client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use callgauge_core::{
    is_rate_limit_signal, Error, GenerationConfig, GenerationResult, Oracle, Result,
};

use crate::config::WatsonxConfig;

/// Which analysis tier a client instance serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleTier {
    /// Full-schema scoring; larger model, larger output budget
    Deep,
    /// Summary-only fallback; smaller model, tighter output budget
    Light,
}

impl OracleTier {
    /// Default model backing this tier
    pub fn default_model(&self) -> &'static str {
        match self {
            OracleTier::Deep => WatsonxClient::LLAMA_3_3_70B_INSTRUCT,
            OracleTier::Light => WatsonxClient::GRANITE_3_3_8B_INSTRUCT,
        }
    }

    /// Generation parameters suited to this tier's output schema
    pub fn generation_config(&self) -> GenerationConfig {
        match self {
            OracleTier::Deep => GenerationConfig {
                max_tokens: 3000,
                timeout: Duration::from_secs(90),
                ..Default::default()
            },
            OracleTier::Light => GenerationConfig {
                max_tokens: 800,
                timeout: Duration::from_secs(45),
                ..Default::default()
            },
        }
    }
}

/// watsonx oracle client
pub struct WatsonxClient {
    config: WatsonxConfig,
    access_token: Option<String>,
    client: Client,
    tier: OracleTier,
    model: String,
}

#[derive(Serialize)]
struct TokenRequest {
    grant_type: String,
    apikey: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct GenerationParams {
    decoding_method: String,
    max_new_tokens: u32,
    min_new_tokens: u32,
    top_k: u32,
    top_p: f32,
    repetition_penalty: f32,
    stop_sequences: Vec<String>,
}

#[derive(Serialize)]
struct GenerationRequest {
    input: String,
    parameters: GenerationParams,
    model_id: String,
    project_id: String,
}

#[derive(Deserialize)]
struct GenerationResults {
    generated_text: String,
}

#[derive(Deserialize)]
struct GenerationData {
    results: Vec<GenerationResults>,
}

impl WatsonxClient {
    /// Model constants
    pub const LLAMA_3_3_70B_INSTRUCT: &'static str = "meta-llama/llama-3-3-70b-instruct";
    pub const GRANITE_3_3_8B_INSTRUCT: &'static str = "ibm/granite-3-3-8b-instruct";

    /// Create a client for the given tier from configuration
    pub fn new(config: WatsonxConfig, tier: OracleTier) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let model = match tier {
            OracleTier::Deep => config.deep_model.clone(),
            OracleTier::Light => config.light_model.clone(),
        }
        .unwrap_or_else(|| tier.default_model().to_string());

        Ok(Self {
            config,
            access_token: None,
            client,
            tier,
            model,
        })
    }

    /// Create a client for the given tier from environment variables
    pub fn from_env(tier: OracleTier) -> Result<Self> {
        let config = WatsonxConfig::from_env()?;
        Self::new(config, tier)
    }

    /// Override the model backing this client
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model = model_id.into();
        self
    }

    /// Which tier this client serves
    pub fn tier(&self) -> OracleTier {
        self.tier
    }

    /// Exchange the API key for an IAM access token
    pub async fn connect(&mut self) -> Result<()> {
        let token_request = TokenRequest {
            grant_type: "urn:ibm:params:oauth:grant-type:apikey".to_string(),
            apikey: self.config.api_key.clone(),
        };

        let url = format!("https://{}/identity/token", self.config.iam_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(&token_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "Authentication failed: {}",
                response.status()
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.access_token = Some(token_response.access_token);
        debug!(tier = ?self.tier, model = %self.model, "watsonx client authenticated");

        Ok(())
    }

    /// Map a non-success generation response into the typed taxonomy.
    ///
    /// This is the one place where capacity exhaustion is recognised from
    /// the raw provider signal; everything downstream matches on variants.
    fn map_failure(status: StatusCode, body: &str) -> Error {
        if status == StatusCode::TOO_MANY_REQUESTS || is_rate_limit_signal(body) {
            Error::RateLimited(format!("watsonx returned {status}: {body}"))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Error::Authentication(format!("watsonx returned {status}: {body}"))
        } else {
            Error::Oracle(format!("watsonx returned {status}: {body}"))
        }
    }

    /// Perform the actual generation request
    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let access_token = self.access_token.as_ref().ok_or_else(|| {
            Error::Authentication("Not authenticated. Call connect() first.".to_string())
        })?;

        let model_id = if config.model_id.is_empty() {
            self.model.clone()
        } else {
            config.model_id.clone()
        };

        let params = GenerationParams {
            decoding_method: "greedy".to_string(),
            max_new_tokens: config.max_tokens,
            min_new_tokens: 5,
            top_k: config.top_k.unwrap_or(50),
            top_p: config.top_p.unwrap_or(1.0),
            repetition_penalty: 1.05,
            stop_sequences: config.stop_sequences.clone(),
        };

        let request_body = GenerationRequest {
            input: prompt.to_string(),
            parameters: params,
            model_id,
            project_id: self.config.project_id.clone(),
        };

        let url = format!(
            "{}/ml/v1/text/generation_stream?version=2023-05-29",
            self.config.api_url
        );

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {access_token}"))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::map_failure(status, &error_text));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        // Reassemble the generated text from the SSE stream. The full body
        // is kept verbatim; the analysis tiers parse JSON out of it.
        let mut answer = String::new();
        for line in response_text.lines() {
            if let Some(json_data) = line.strip_prefix("data: ") {
                if json_data.trim().is_empty() || json_data.trim() == "[DONE]" {
                    continue;
                }

                match serde_json::from_str::<GenerationData>(json_data) {
                    Ok(data) => {
                        if let Some(result) = data.results.first() {
                            answer.push_str(&result.generated_text);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping unparseable stream line");
                    }
                }
            }
        }

        if answer.trim().is_empty() {
            return Err(Error::Oracle(format!(
                "Empty response from watsonx. Raw response: {response_text}"
            )));
        }

        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl Oracle for WatsonxClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult> {
        let generation_future = self.perform_generation(prompt, config);

        let text = match timeout(config.timeout, generation_future).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Timeout(format!(
                    "generation exceeded {:?} (model {})",
                    config.timeout, self.model
                )));
            }
        };

        debug!(tier = ?self.tier, chars = text.len(), "watsonx generation complete");

        Ok(GenerationResult {
            text,
            model_id: self.model.clone(),
            tokens_used: None,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_failure_recognises_capacity_signals() {
        let err = WatsonxClient::map_failure(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, Error::RateLimited(_)));

        let err = WatsonxClient::map_failure(
            StatusCode::SERVICE_UNAVAILABLE,
            "Token quota exceeded for this project",
        );
        assert!(matches!(err, Error::RateLimited(_)));
    }

    #[test]
    fn test_map_failure_auth_and_other() {
        let err = WatsonxClient::map_failure(StatusCode::UNAUTHORIZED, "bad token");
        assert!(matches!(err, Error::Authentication(_)));

        let err = WatsonxClient::map_failure(StatusCode::BAD_REQUEST, "unknown model id");
        assert!(matches!(err, Error::Oracle(_)));
    }

    #[test]
    fn test_tier_models_differ() {
        let config = WatsonxConfig::new("test_key".to_string(), "test_project".to_string());
        let deep = WatsonxClient::new(config.clone(), OracleTier::Deep).unwrap();
        let light = WatsonxClient::new(config, OracleTier::Light).unwrap();
        assert_ne!(deep.model_id(), light.model_id());
        assert_eq!(deep.model_id(), WatsonxClient::LLAMA_3_3_70B_INSTRUCT);
        assert_eq!(light.model_id(), WatsonxClient::GRANITE_3_3_8B_INSTRUCT);
    }

    #[test]
    fn test_config_model_override_wins() {
        let mut config = WatsonxConfig::new("test_key".to_string(), "test_project".to_string());
        config.deep_model = Some("ibm/granite-4-h-small".to_string());
        let deep = WatsonxClient::new(config, OracleTier::Deep).unwrap();
        assert_eq!(deep.model_id(), "ibm/granite-4-h-small");
    }

    #[test]
    fn test_tier_generation_budgets() {
        let deep = OracleTier::Deep.generation_config();
        let light = OracleTier::Light.generation_config();
        assert!(deep.max_tokens > light.max_tokens);
        assert!(deep.timeout > light.timeout);
    }
}
