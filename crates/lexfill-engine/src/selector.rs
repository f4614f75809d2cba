//! Deterministic next-question selection
//!
//! Missing placeholders are ordered by the configured kind priority, ties
//! broken by first-occurrence order. The first one gets a question built
//! from its label and context, the examples for its kind, and a suggestion
//! drawn from values already given in the session.

use crate::config::EngineConfig;
use lexfill_domain::{
    NextQuestion, Placeholder, PlaceholderKind, PlaceholderRegistry, Question, QuestionSource,
};

/// Picks the next placeholder to ask about
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    priority: Vec<PlaceholderKind>,
}

impl QuestionSelector {
    /// Create a selector with an explicit kind priority
    pub fn new(priority: Vec<PlaceholderKind>) -> Self {
        Self { priority }
    }

    /// Create a selector from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.type_priority.clone())
    }

    fn rank(&self, kind: PlaceholderKind) -> usize {
        self.priority
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(self.priority.len())
    }

    /// Missing placeholders in selection order
    pub fn missing_in_order<'r>(&self, registry: &'r PlaceholderRegistry) -> Vec<&'r Placeholder> {
        let mut missing: Vec<&Placeholder> = registry.missing().collect();
        // Stable: equal ranks keep first-occurrence order
        missing.sort_by_key(|p| self.rank(p.kind));
        missing
    }

    /// Select the next question, or report none remaining
    pub fn next(&self, registry: &PlaceholderRegistry) -> NextQuestion {
        let missing = self.missing_in_order(registry);
        let Some(first) = missing.first() else {
            return NextQuestion::none_remaining();
        };

        NextQuestion {
            next: Some(self.question_for(first, registry)),
            remaining_count: missing.len(),
            missing_keys: missing.iter().map(|p| p.key.clone()).collect(),
        }
    }

    /// Build the question for a specific placeholder
    pub fn question_for(&self, placeholder: &Placeholder, registry: &PlaceholderRegistry) -> Question {
        let (question, examples) = wording(placeholder);
        Question {
            key: placeholder.key.clone(),
            label: placeholder.label.clone(),
            kind: placeholder.kind,
            question,
            examples: examples.into_iter().map(String::from).collect(),
            suggestion: suggestion(placeholder, registry),
            source: QuestionSource::Deterministic,
        }
    }
}

/// Lowercase text with hyphen variants read as spaces
fn fold(text: &str) -> String {
    text.to_lowercase()
        .replace(['-', '\u{2010}', '\u{2011}', '\u{2013}'], " ")
}

fn is_all_uppercase(label: &str) -> bool {
    label.chars().any(char::is_alphabetic) && !label.chars().any(char::is_lowercase)
}

fn wording(placeholder: &Placeholder) -> (String, Vec<&'static str>) {
    let label = &placeholder.label;
    let folded = fold(label);
    let context = placeholder.context.as_deref().map(fold).unwrap_or_default();
    let mentions = |cue: &str| folded.contains(cue) || context.contains(cue);

    match placeholder.kind {
        PlaceholderKind::Currency => {
            if mentions("post money valuation cap") || folded.contains("valuation cap") {
                ("What is the Post-Money Valuation Cap (in USD)?".into(), vec!["$8,000,000", "$5,000,000"])
            } else if mentions("purchase amount") {
                ("What is the Purchase Amount (in USD)?".into(), vec!["$250,000", "$100,000"])
            } else {
                (format!("What is the {} (in USD)?", label), vec!["$1,000,000", "250k"])
            }
        }
        PlaceholderKind::Date => (
            format!("What is the {}? (e.g., September 15, 2025)", label),
            vec!["September 15, 2025", "2025-09-15", "9/15/2025"],
        ),
        PlaceholderKind::Name => {
            if folded.contains("investor") {
                ("What is the investor's legal name (entity or individual)?".into(), vec!["Sample Capital LLC"])
            } else if folded.contains("company") && is_all_uppercase(label) {
                (
                    "Confirm the uppercase company name for the signature block.".into(),
                    vec!["ALPHASOFT TECHNOLOGIES LTD"],
                )
            } else if folded.contains("company") {
                (
                    "What is the company's full legal name (as in formation documents)?".into(),
                    vec!["AlphaSoft Technologies LTD"],
                )
            } else if folded == "name" {
                ("Who is signing on behalf of the company (full name)?".into(), vec!["Jane Doe"])
            } else {
                (format!("What is the {}?", label), vec!["Jane Doe"])
            }
        }
        PlaceholderKind::Jurisdiction => {
            if folded.contains("state of incorporation") {
                ("What is the company's state of incorporation?".into(), vec!["Delaware", "California"])
            } else if folded.contains("governing law") {
                ("What is the governing law jurisdiction?".into(), vec!["Delaware", "California"])
            } else {
                (format!("Which jurisdiction applies for {}?", label), vec!["Delaware", "California"])
            }
        }
        PlaceholderKind::String => {
            if folded == "title" {
                ("What is the signatory's title?".into(), vec!["Founder & CEO"])
            } else if folded.contains("email") {
                ("Provide the email address.".into(), vec!["legal@example.com"])
            } else if folded.contains("address") {
                ("Provide the full mailing address.".into(), vec!["123 Market St, San Francisco, CA 94103"])
            } else {
                (format!("Please provide a value for {}.", label), vec![])
            }
        }
    }
}

/// Previously given value of the same kind, if any
///
/// A filled placeholder sharing a word with this label is preferred over
/// the most recently listed one. All-uppercase labels get the value
/// uppercased.
fn suggestion(placeholder: &Placeholder, registry: &PlaceholderRegistry) -> Option<String> {
    let words: Vec<String> = fold(&placeholder.label)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let candidates: Vec<&Placeholder> = registry
        .filled_of_kind(placeholder.kind)
        .filter(|p| p.key != placeholder.key)
        .collect();

    let related = candidates.iter().rev().find(|p| {
        fold(&p.label)
            .split_whitespace()
            .any(|w| words.iter().any(|own| own == w))
    });
    let value = related.or(candidates.last())?.value.clone()?;

    if is_all_uppercase(&placeholder.label) {
        Some(value.to_uppercase())
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PlaceholderRegistry {
        vec![
            Placeholder::new("purchase_amount", "Purchase Amount", PlaceholderKind::Currency),
            Placeholder::new("company_name", "Company Name", PlaceholderKind::Name),
            Placeholder::new("date_of_safe", "Date of Safe", PlaceholderKind::Date),
            Placeholder::new("state_of_incorporation", "State of Incorporation", PlaceholderKind::Jurisdiction),
            Placeholder::new("investor_name", "Investor Name", PlaceholderKind::Name),
            Placeholder::new("company", "COMPANY", PlaceholderKind::Name),
            Placeholder::new("title", "Title", PlaceholderKind::String),
        ]
        .into_iter()
        .collect()
    }

    fn selector() -> QuestionSelector {
        QuestionSelector::from_config(&EngineConfig::default())
    }

    #[test]
    fn test_priority_then_first_occurrence() {
        let registry = registry();
        let next = selector().next(&registry);
        assert_eq!(
            next.missing_keys,
            vec![
                "company_name",
                "investor_name",
                "company",
                "date_of_safe",
                "purchase_amount",
                "state_of_incorporation",
                "title",
            ]
        );
        assert_eq!(next.remaining_count, 7);
        assert_eq!(next.next.unwrap().key, "company_name");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let registry = registry();
        let first = selector().next(&registry);
        for _ in 0..10 {
            assert_eq!(selector().next(&registry), first);
        }
    }

    #[test]
    fn test_custom_priority() {
        let selector = QuestionSelector::new(vec![PlaceholderKind::Currency]);
        let next = selector.next(&registry());
        assert_eq!(next.next.unwrap().key, "purchase_amount");
    }

    #[test]
    fn test_terminal_state() {
        let mut registry = registry();
        let keys: Vec<String> = registry.iter().map(|p| p.key.clone()).collect();
        for key in keys {
            registry.assign(&key, "x").unwrap();
        }
        let next = selector().next(&registry);
        assert!(next.is_complete());
        assert_eq!(next.remaining_count, 0);
        assert!(next.missing_keys.is_empty());
    }

    #[test]
    fn test_uppercase_suggestion_from_related_label() {
        let mut registry = registry();
        registry.assign("company_name", "AlphaSoft Technologies LTD").unwrap();
        registry.assign("investor_name", "Sample Capital LLC").unwrap();

        let question = selector().next(&registry).next.unwrap();
        assert_eq!(question.key, "company");
        assert_eq!(question.suggestion.as_deref(), Some("ALPHASOFT TECHNOLOGIES LTD"));
        assert_eq!(question.examples, vec!["ALPHASOFT TECHNOLOGIES LTD"]);
    }

    #[test]
    fn test_no_suggestion_without_same_kind_values() {
        let question = selector().next(&registry()).next.unwrap();
        assert_eq!(question.suggestion, None);
        assert_eq!(question.source, QuestionSource::Deterministic);
    }

    #[test]
    fn test_currency_wording_uses_context() {
        let cap = Placeholder::new("amount", "Amount", PlaceholderKind::Currency)
            .with_context("The \"Post-Money Valuation Cap\" is $[_____________]");
        let registry: PlaceholderRegistry = vec![cap.clone()].into_iter().collect();
        let question = selector().question_for(&cap, &registry);
        assert_eq!(question.question, "What is the Post-Money Valuation Cap (in USD)?");
        assert_eq!(question.examples, vec!["$8,000,000", "$5,000,000"]);

        let plain = Placeholder::new("fee", "Fee", PlaceholderKind::Currency);
        let question = selector().question_for(&plain, &registry);
        assert_eq!(question.question, "What is the Fee (in USD)?");
    }

    #[test]
    fn test_generic_string_wording() {
        let other = Placeholder::new("notes", "Notes", PlaceholderKind::String);
        let registry: PlaceholderRegistry = vec![other.clone()].into_iter().collect();
        let question = selector().question_for(&other, &registry);
        assert_eq!(question.question, "Please provide a value for Notes.");
        assert!(question.examples.is_empty());
    }
}
