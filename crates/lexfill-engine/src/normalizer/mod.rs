//! Value normalizers
//!
//! Pure functions turning a raw user string into the canonical text written
//! into the document. A failure carries the input and accepted examples and
//! never yields a partial value.

mod currency;
mod date;

pub use currency::normalize_currency;
pub use date::normalize_date;

use crate::error::NormalizationError;
use lexfill_domain::PlaceholderKind;

/// Normalize a raw value for a placeholder kind
pub fn normalize(kind: PlaceholderKind, raw: &str) -> Result<String, NormalizationError> {
    match kind {
        PlaceholderKind::Currency => normalize_currency(raw),
        PlaceholderKind::Date => normalize_date(raw),
        PlaceholderKind::Name | PlaceholderKind::Jurisdiction | PlaceholderKind::String => {
            normalize_text(kind, raw)
        }
    }
}

/// Trim and collapse internal whitespace; empty input is rejected
pub fn normalize_text(kind: PlaceholderKind, raw: &str) -> Result<String, NormalizationError> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return Err(NormalizationError::new(kind, raw, "value is empty"));
    }
    Ok(collapsed)
}

/// Example inputs accepted for a kind
pub fn accepted_examples(kind: PlaceholderKind) -> &'static [&'static str] {
    match kind {
        PlaceholderKind::Currency => &["$250,000", "250k", "1.25m", "USD 5,500,000"],
        PlaceholderKind::Date => &[
            "2025-09-15",
            "9/15/2025",
            "15 Sep 2025",
            "September 15, 2025",
            "15th September 2025",
        ],
        PlaceholderKind::Name => &["AlphaSoft Technologies LTD", "Sample Capital LLC"],
        PlaceholderKind::Jurisdiction => &["Delaware", "California"],
        PlaceholderKind::String => &["Any non-empty text"],
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_kind() {
        assert_eq!(normalize(PlaceholderKind::Currency, "250k").unwrap(), "$250,000");
        assert_eq!(normalize(PlaceholderKind::Date, "2025-09-15").unwrap(), "September 15, 2025");
        assert_eq!(
            normalize(PlaceholderKind::Name, "  Sample   Capital LLC ").unwrap(),
            "Sample Capital LLC"
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = normalize(PlaceholderKind::Jurisdiction, "   ").unwrap_err();
        assert_eq!(err.kind, PlaceholderKind::Jurisdiction);
        assert_eq!(err.accepted_examples, vec!["Delaware", "California"]);
    }

    #[test]
    fn test_every_example_is_accepted() {
        for kind in PlaceholderKind::ALL {
            for example in accepted_examples(kind) {
                assert!(normalize(kind, example).is_ok(), "{} rejected {}", kind, example);
            }
        }
    }
}
