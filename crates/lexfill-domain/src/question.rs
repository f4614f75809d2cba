//! Question records produced by the selector and consumed by callers

use crate::placeholder::PlaceholderKind;
use serde::{Deserialize, Serialize};

/// Where the wording of a question came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    /// Built by the deterministic selector
    #[default]
    Deterministic,

    /// Rephrased by a text advisor
    Advisor,
}

/// The prompt for one missing placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Key of the selected placeholder
    pub key: String,

    /// Label of the selected placeholder
    pub label: String,

    /// Semantic type of the selected placeholder
    #[serde(rename = "type")]
    pub kind: PlaceholderKind,

    /// Human-readable question
    pub question: String,

    /// Accepted example inputs
    pub examples: Vec<String>,

    /// Optional default answer
    #[serde(default)]
    pub suggestion: Option<String>,

    /// Origin of the wording
    #[serde(default)]
    pub source: QuestionSource,
}

impl Question {
    /// Overlay an advisor's wording
    ///
    /// The key, label and kind are never touched: an advisor may change how a
    /// question reads, not which placeholder it asks about.
    pub fn refined(mut self, refinement: QuestionRefinement) -> Self {
        if !refinement.question.trim().is_empty() {
            self.question = refinement.question;
        }
        if !refinement.examples.is_empty() {
            self.examples = refinement.examples;
        }
        if refinement.suggestion.is_some() {
            self.suggestion = refinement.suggestion;
        }
        self.source = QuestionSource::Advisor;
        self
    }
}

/// Answer to the next-question query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextQuestion {
    /// The question for the selected placeholder, or `None` when complete
    pub next: Option<Question>,

    /// Number of placeholders without a value
    pub remaining_count: usize,

    /// Keys without a value, in selection order
    pub missing_keys: Vec<String>,
}

impl NextQuestion {
    /// The terminal answer: nothing left to ask
    pub fn none_remaining() -> Self {
        Self {
            next: None,
            remaining_count: 0,
            missing_keys: Vec::new(),
        }
    }

    /// Whether every placeholder has a value
    pub fn is_complete(&self) -> bool {
        self.next.is_none()
    }
}

/// Everything a text advisor may look at when rephrasing a question
#[derive(Debug, Clone)]
pub struct AdvisorRequest {
    /// The deterministic question
    pub question: Question,

    /// Remaining keys in selection order
    pub missing_keys: Vec<String>,

    /// Already-filled `(label, value)` pairs
    pub filled: Vec<(String, String)>,

    /// Text surrounding the placeholder, if captured at scan time
    pub excerpt: Option<String>,
}

/// An advisor's rewording of a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRefinement {
    /// Replacement question text
    pub question: String,

    /// Replacement example inputs (empty keeps the originals)
    #[serde(default)]
    pub examples: Vec<String>,

    /// Replacement suggestion (`None` keeps the original)
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Question {
        Question {
            key: "company_name".to_string(),
            label: "Company Name".to_string(),
            kind: PlaceholderKind::Name,
            question: "What is the company name?".to_string(),
            examples: vec!["AlphaSoft Technologies LTD".to_string()],
            suggestion: None,
            source: QuestionSource::Deterministic,
        }
    }

    #[test]
    fn test_refined_keeps_identity() {
        let refined = base().refined(QuestionRefinement {
            question: "What's the company's full legal name?".to_string(),
            examples: vec![],
            suggestion: None,
        });

        assert_eq!(refined.key, "company_name");
        assert_eq!(refined.kind, PlaceholderKind::Name);
        assert_eq!(refined.question, "What's the company's full legal name?");
        assert_eq!(refined.examples, vec!["AlphaSoft Technologies LTD".to_string()]);
        assert_eq!(refined.source, QuestionSource::Advisor);
    }

    #[test]
    fn test_blank_refinement_keeps_text() {
        let refined = base().refined(QuestionRefinement::default());
        assert_eq!(refined.question, "What is the company name?");
    }

    #[test]
    fn test_none_remaining() {
        let next = NextQuestion::none_remaining();
        assert!(next.is_complete());
        assert_eq!(next.remaining_count, 0);
        assert!(next.missing_keys.is_empty());
    }
}
