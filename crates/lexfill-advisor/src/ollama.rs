//! Ollama Provider Implementation
//!
//! Sends prompts to a local Ollama instance, keeping template contents on
//! the machine.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/generate` endpoint
//! - Configurable endpoint, model and timeout
//! - Retry logic with exponential backoff
//! - Blocking `LlmProvider` wrapper for synchronous callers
//!
//! # Examples
//!
//! ```no_run
//! use lexfill_advisor::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1")?;
//! # Ok::<(), lexfill_advisor::AdvisorError>(())
//! ```

use crate::transport;
use crate::AdvisorError;
use lexfill_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local LLM inference
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, AdvisorError> {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a provider with a custom request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AdvisorError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: transport::client(timeout_secs)?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, AdvisorError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        let response: OllamaGenerateResponse =
            transport::post_json(&self.client, &url, None, &body, &self.model, self.max_retries)
                .await?;
        Ok(response.response)
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = AdvisorError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        transport::block_on(OllamaProvider::generate(self, prompt))
    }
}
