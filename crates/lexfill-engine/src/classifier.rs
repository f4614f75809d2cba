//! Rule-table classification of placeholder tokens
//!
//! Rules are evaluated top to bottom against the lowercased token literal;
//! the first rule with a matching cue decides the kind. Tokens that match
//! no rule are plain strings.

use lexfill_domain::PlaceholderKind;

/// One classification rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Kind assigned when a cue matches
    pub kind: PlaceholderKind,
    /// Substrings that select this rule
    pub cues: &'static [&'static str],
}

/// Default rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        kind: PlaceholderKind::Currency,
        cues: &["$", "valuation", "amount", "cap", "price"],
    },
    Rule {
        kind: PlaceholderKind::Date,
        cues: &["date"],
    },
    Rule {
        kind: PlaceholderKind::Jurisdiction,
        cues: &["state", "jurisdiction", "governing law"],
    },
    Rule {
        kind: PlaceholderKind::Name,
        cues: &["name", "company", "investor"],
    },
];

/// Classify a token by its literal text, brackets included
pub fn classify(literal: &str) -> PlaceholderKind {
    classify_with(RULES, literal)
}

/// Classify a token against an explicit rule table
pub fn classify_with(rules: &[Rule], literal: &str) -> PlaceholderKind {
    let lowered = literal.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.cues.iter().any(|cue| lowered.contains(cue)))
        .map(|rule| rule.kind)
        .unwrap_or(PlaceholderKind::String)
}
