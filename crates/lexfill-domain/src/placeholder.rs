//! Placeholder module - the unit of work for template filling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a placeholder
///
/// Assigned once by the classifier when the template is scanned and never
/// changed afterwards. The kind selects the value normalizer and the
/// question wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    /// A dollar amount, normalized to `$1,234,567`
    Currency,

    /// A calendar date, normalized to `September 15, 2025`
    Date,

    /// A person or entity name
    Name,

    /// A state or governing-law jurisdiction
    Jurisdiction,

    /// Anything else
    String,
}

impl PlaceholderKind {
    /// Every kind, in declaration order
    pub const ALL: [PlaceholderKind; 5] = [
        PlaceholderKind::Currency,
        PlaceholderKind::Date,
        PlaceholderKind::Name,
        PlaceholderKind::Jurisdiction,
        PlaceholderKind::String,
    ];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderKind::Currency => "currency",
            PlaceholderKind::Date => "date",
            PlaceholderKind::Name => "name",
            PlaceholderKind::Jurisdiction => "jurisdiction",
            PlaceholderKind::String => "string",
        }
    }

    /// Parse a kind from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "currency" => Some(PlaceholderKind::Currency),
            "date" => Some(PlaceholderKind::Date),
            "name" => Some(PlaceholderKind::Name),
            "jurisdiction" => Some(PlaceholderKind::Jurisdiction),
            "string" => Some(PlaceholderKind::String),
            _ => None,
        }
    }
}

impl std::str::FromStr for PlaceholderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid placeholder type: {}", s))
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder discovered in a template
///
/// Serializes to the interchange record `{key, label, type, occurrences, value?}`.
/// The key is stable for the life of a session, and every occurrence of the
/// key receives the same value on replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Stable slug derived from the label
    pub key: String,

    /// Human text extracted from the token
    pub label: String,

    /// Semantic type
    #[serde(rename = "type")]
    pub kind: PlaceholderKind,

    /// Number of token instances sharing this key across all parts
    pub occurrences: usize,

    /// Canonical normalized value, once filled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Text around the first occurrence, token included, used for question wording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Placeholder {
    /// Create an unfilled placeholder with a single occurrence
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: PlaceholderKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            occurrences: 1,
            value: None,
            context: None,
        }
    }

    /// Attach the surrounding-text excerpt
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.trim().is_empty() { None } else { Some(context) };
        self
    }

    /// Whether a value has been assigned
    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_round_trip() {
        for kind in PlaceholderKind::ALL {
            assert_eq!(PlaceholderKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PlaceholderKind::parse("CURRENCY"), Some(PlaceholderKind::Currency));
        assert!("email".parse::<PlaceholderKind>().is_err());
    }

    #[test]
    fn test_interchange_record_shape() {
        let ph = Placeholder::new("company_name", "Company Name", PlaceholderKind::Name);
        let json = serde_json::to_value(&ph).unwrap();

        assert_eq!(json["key"], "company_name");
        assert_eq!(json["type"], "name");
        assert_eq!(json["occurrences"], 1);
        assert!(json.get("value").is_none());
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_blank_context_is_dropped() {
        let ph = Placeholder::new("k", "K", PlaceholderKind::String).with_context("   ");
        assert!(ph.context.is_none());
    }
}
