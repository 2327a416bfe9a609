//! Generative oracle trait and invocation configuration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for a single oracle invocation
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Vec<String>,
    /// Wall-clock bound on one oracle round-trip; expiry maps to
    /// [`crate::Error::Timeout`]
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: String::new(),
            max_tokens: 2000,
            top_k: None,
            top_p: None,
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Result of an oracle invocation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Abstract generative-analysis oracle
///
/// The pipeline calls two independently configured instances of this trait:
/// a high-fidelity primary and a reduced-fidelity backup. Implementations
/// must map provider failures into the typed [`crate::Error`] taxonomy at
/// this boundary.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate output for a prompt
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult>;

    /// Identifier of the model backing this oracle
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for std::sync::Arc<O> {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult> {
        (**self).generate(prompt, config).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Retry policy for the primary analysis tier
///
/// Injectable so tests can run with near-zero delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1500),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Policy with no waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Backoff delay after a failed attempt: `base × multiplier^(attempt − 1)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.base_delay.mul_f64(self.backoff_multiplier.powi(exponent as i32))
    }
}
