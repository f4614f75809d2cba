//! Configuration for the text advisor

use crate::{ollama, openai, AdvisorError, ConfiguredProvider, OllamaProvider, OpenAiProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which backend serves the advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama instance
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions
    OpenAi,
}

/// Configuration for the text advisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Whether questions are sent to a model at all
    pub enabled: bool,

    /// Backend to use when enabled
    pub provider: ProviderKind,

    /// API base; the provider's default when unset
    pub endpoint: Option<String>,

    /// Model name
    pub model: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per request
    pub max_retries: u32,
}

impl AdvisorConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint in effect
    pub fn effective_endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint,
            (None, ProviderKind::Ollama) => ollama::DEFAULT_ENDPOINT,
            (None, ProviderKind::OpenAi) => openai::DEFAULT_ENDPOINT,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!("endpoint '{}' must be an http(s) URL", endpoint));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Build the configured provider
    ///
    /// Returns `Ok(None)` when the advisor is disabled.
    pub fn build_provider(&self) -> Result<Option<ConfiguredProvider>, AdvisorError> {
        if !self.enabled {
            return Ok(None);
        }
        self.validate().map_err(AdvisorError::Config)?;

        let endpoint = self.effective_endpoint();
        let provider = match self.provider {
            ProviderKind::Ollama => ConfiguredProvider::Ollama(
                OllamaProvider::with_timeout(endpoint, &self.model, self.timeout_secs)?
                    .with_max_retries(self.max_retries),
            ),
            ProviderKind::OpenAi => ConfiguredProvider::OpenAi(
                OpenAiProvider::from_env(endpoint, &self.model, self.timeout_secs)?
                    .with_max_retries(self.max_retries),
            ),
        };
        Ok(Some(provider))
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: ProviderKind::Ollama,
            endpoint: None,
            model: "llama3.1".to_string(),
            timeout_secs: ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: ollama::DEFAULT_MAX_RETRIES,
        }
    }
}
