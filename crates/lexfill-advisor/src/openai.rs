//! OpenAI-compatible chat completions provider
//!
//! Works against api.openai.com or any server exposing the same
//! `/chat/completions` route. The API key is read from `OPENAI_API_KEY`.

use crate::transport;
use crate::AdvisorError;
use lexfill_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};

/// Default API base
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const SYSTEM_MESSAGE: &str = "You are a precise legal-document assistant. \
Return ONLY strict JSON with double quotes; no code fences, no extra commentary.";

/// Chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider with an explicit key
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AdvisorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdvisorError::Config("API key is empty".to_string()));
        }
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: transport::client(timeout_secs)?,
            max_retries: crate::ollama::DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider reading the key from `OPENAI_API_KEY`
    pub fn from_env(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AdvisorError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| AdvisorError::Config(format!("{} is not set", API_KEY_VAR)))?;
        Self::new(endpoint, model, api_key, timeout_secs)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send one chat completion and return the assistant's text
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_MESSAGE },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        let response: ChatResponse = transport::post_json(
            &self.client,
            &url,
            Some(&self.api_key),
            &body,
            &self.model,
            self.max_retries,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AdvisorError::InvalidResponse("Response has no message content".to_string()))
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = AdvisorError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        transport::block_on(OpenAiProvider::generate(self, prompt))
    }
}
