//! Date normalization: raw text to `September 15, 2025`

use super::collapse_whitespace;
use crate::error::NormalizationError;
use chrono::{Datelike, NaiveDate};
use lexfill_domain::PlaceholderKind;
use regex::Regex;
use std::sync::LazyLock;

/// Patterns tried in order; the first that parses wins.
///
/// chrono's month-name specifiers accept both full and abbreviated names,
/// so `%B` also covers `Sep 15, 2025`. Day-first numeric forms come last so
/// `9/10/2025` stays a US date. Two-digit years map to 1970-2069.
const PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d %b %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d/%m/%Y",
    "%d/%m/%y",
    "%d-%m-%Y",
];

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());

/// Normalize a date to `Month D, YYYY`
///
/// # Examples
///
/// ```
/// use lexfill_engine::normalizer::normalize_date;
///
/// assert_eq!(normalize_date("15th September 2025").unwrap(), "September 15, 2025");
/// ```
pub fn normalize_date(raw: &str) -> Result<String, NormalizationError> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return Err(NormalizationError::new(PlaceholderKind::Date, raw, "value is empty"));
    }

    let without_ordinals = ORDINAL_RE.replace_all(&collapsed, "${1}");
    let mut candidates = vec![collapsed.as_str()];
    if without_ordinals != collapsed {
        candidates.push(&*without_ordinals);
    }

    candidates
        .into_iter()
        .find_map(parse_any)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .ok_or_else(|| {
            NormalizationError::new(PlaceholderKind::Date, raw, "not a recognized calendar date")
        })
}

fn parse_any(candidate: &str) -> Option<NaiveDate> {
    PATTERNS
        .iter()
        .filter_map(|pattern| NaiveDate::parse_from_str(candidate, pattern).ok())
        .find(|date| (1000..=9999).contains(&date.year()))
}
