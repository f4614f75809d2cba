//! Text advisors

use crate::parser::parse_refinement;
use crate::prompt::PromptBuilder;
use crate::AdvisorError;
use lexfill_domain::traits::{LlmProvider, TextAdvisor};
use lexfill_domain::{AdvisorRequest, QuestionRefinement};
use std::convert::Infallible;
use std::fmt::Display;
use tracing::{debug, instrument};

/// Advisor that keeps the selector's wording
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicAdvisor;

impl TextAdvisor for DeterministicAdvisor {
    type Error = Infallible;

    fn refine(&self, request: &AdvisorRequest) -> Result<QuestionRefinement, Self::Error> {
        Ok(QuestionRefinement {
            question: request.question.question.clone(),
            examples: request.question.examples.clone(),
            suggestion: request.question.suggestion.clone(),
        })
    }
}

/// Advisor that asks a language model to reword the question
///
/// # Examples
///
/// ```
/// use lexfill_advisor::{LlmAdvisor, MockProvider};
///
/// let advisor = LlmAdvisor::new(MockProvider::new(
///     r#"{"key": "title", "question": "What is your job title?"}"#,
/// ));
/// assert_eq!(advisor.provider().call_count(), 0);
/// ```
#[derive(Debug)]
pub struct LlmAdvisor<P> {
    provider: P,
}

impl<P: LlmProvider> LlmAdvisor<P> {
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> TextAdvisor for LlmAdvisor<P>
where
    P: LlmProvider,
    P::Error: Display,
{
    type Error = AdvisorError;

    #[instrument(skip_all, fields(key = %request.question.key))]
    fn refine(&self, request: &AdvisorRequest) -> Result<QuestionRefinement, Self::Error> {
        let prompt = PromptBuilder::from_request(request).build();
        debug!(prompt_len = prompt.len(), "requesting question refinement");

        let response = self
            .provider
            .generate(&prompt)
            .map_err(|e| AdvisorError::Communication(e.to_string()))?;

        parse_refinement(&response, &request.question.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use lexfill_domain::{PlaceholderKind, Question, QuestionSource};

    fn request() -> AdvisorRequest {
        AdvisorRequest {
            question: Question {
                key: "company".to_string(),
                label: "COMPANY".to_string(),
                kind: PlaceholderKind::Name,
                question: "What is the company name (uppercase for the signature block)?".to_string(),
                examples: vec!["ALPHASOFT TECHNOLOGIES LTD".to_string()],
                suggestion: Some("ALPHASOFT TECHNOLOGIES LTD".to_string()),
                source: QuestionSource::Deterministic,
            },
            missing_keys: vec!["company".to_string(), "title".to_string()],
            filled: vec![("Company Name".to_string(), "AlphaSoft Technologies LTD".to_string())],
            excerpt: Some("IN WITNESS WHEREOF [COMPANY] By:".to_string()),
        }
    }

    #[test]
    fn test_deterministic_advisor_echoes() {
        let refinement = DeterministicAdvisor.refine(&request()).unwrap();
        assert_eq!(
            refinement.question,
            "What is the company name (uppercase for the signature block)?"
        );
        assert_eq!(refinement.suggestion.as_deref(), Some("ALPHASOFT TECHNOLOGIES LTD"));
    }

    #[test]
    fn test_llm_advisor_sends_context() {
        let provider = MockProvider::new(
            r#"{"key": "company", "question": "How should the company name appear in the signature block?"}"#,
        );
        let advisor = LlmAdvisor::new(provider.clone());

        let refinement = advisor.refine(&request()).unwrap();
        assert_eq!(
            refinement.question,
            "How should the company name appear in the signature block?"
        );

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("IN WITNESS WHEREOF [COMPANY] By:"));
        assert!(prompt.contains("- Company Name: AlphaSoft Technologies LTD"));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_llm_advisor_rejects_other_key() {
        let advisor = LlmAdvisor::new(MockProvider::new(r#"{"key": "title", "question": "Title?"}"#));
        assert!(matches!(
            advisor.refine(&request()),
            Err(AdvisorError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_llm_advisor_provider_failure() {
        let mut provider = MockProvider::default();
        let prompt = PromptBuilder::from_request(&request()).build();
        provider.add_error(prompt);

        let advisor = LlmAdvisor::new(provider);
        assert!(matches!(
            advisor.refine(&request()),
            Err(AdvisorError::Communication(_))
        ));
    }
}
