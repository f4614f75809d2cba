//! Lexfill Text Advisor
//!
//! Optional rephrasing of the question selector's output.
//!
//! # Architecture
//!
//! This crate implements the `TextAdvisor` and `LlmProvider` traits from
//! `lexfill-domain`. An advisor receives the deterministic question together
//! with the remaining keys, the filled values and the text around the
//! placeholder, and may propose friendlier wording. It never decides which
//! placeholder is asked about: a response that names another key is
//! rejected.
//!
//! # Advisors
//!
//! - `DeterministicAdvisor`: echoes the selector's wording (the default)
//! - `LlmAdvisor`: builds a prompt, calls an `LlmProvider`, parses the JSON reply
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat completions
//!
//! # Examples
//!
//! ```
//! use lexfill_advisor::MockProvider;
//! use lexfill_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

mod advisor;
mod config;
mod transport;

pub mod ollama;
pub mod openai;
pub mod parser;
pub mod prompt;

use lexfill_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use advisor::{DeterministicAdvisor, LlmAdvisor};
pub use config::{AdvisorConfig, ProviderKind};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use prompt::PromptBuilder;

/// Errors that can occur while asking an advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The response rephrased a different placeholder
    #[error("Response names key '{found}', expected '{expected}'")]
    KeyMismatch {
        /// Key the question was about
        expected: String,
        /// Key the response named
        found: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or invalid advisor configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("Advisor error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls, and
/// remembers the last prompt it was given.
///
/// # Examples
///
/// ```
/// use lexfill_advisor::MockProvider;
/// use lexfill_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

/// Marker stored in place of a response to make a prompt fail
const ERROR_SENTINEL: &str = "ERROR";

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        guard(&self.responses).insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        guard(&self.responses).insert(prompt.into(), ERROR_SENTINEL.to_string());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *guard(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *guard(&self.call_count) = 0;
    }

    /// The prompt passed to the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        guard(&self.last_prompt).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = AdvisorError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *guard(&self.call_count) += 1;
        *guard(&self.last_prompt) = Some(prompt.to_string());

        match guard(&self.responses).get(prompt) {
            Some(response) if response == ERROR_SENTINEL => {
                Err(AdvisorError::Other("Mock error".to_string()))
            }
            Some(response) => Ok(response.clone()),
            None => Ok(self.default_response.clone()),
        }
    }
}

/// A provider chosen at runtime from an [`AdvisorConfig`]
#[derive(Debug)]
pub enum ConfiguredProvider {
    /// Local Ollama instance
    Ollama(OllamaProvider),
    /// OpenAI-compatible endpoint
    OpenAi(OpenAiProvider),
}

impl LlmProviderTrait for ConfiguredProvider {
    type Error = AdvisorError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Self::Ollama(provider) => LlmProviderTrait::generate(provider, prompt),
            Self::OpenAi(provider) => LlmProviderTrait::generate(provider, prompt),
        }
    }
}
