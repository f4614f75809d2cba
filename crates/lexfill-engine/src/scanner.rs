//! Placeholder discovery
//!
//! The scanner flattens each part through the logical text map, so a token
//! is found the same way whether Word stored it in one run or in ten.
//!
//! # Token grammar
//!
//! - `$[_____]` and `[_____]`: blanks of three or more underscores, hyphens
//!   or em dashes. The dollar form is labelled "Amount", the plain form
//!   "Blank".
//! - `[Label]` or `$[Label]`: any bracketed text without nested brackets.
//!   A leading `$` belongs to the token so a currency value replaces it.
//!
//! Tokens are matched one paragraph at a time, so a token never spans a
//! paragraph break and stray brackets in one paragraph cannot hide a token
//! in the next.

use crate::classifier::classify;
use crate::part::XmlPart;
use crate::text_map::LogicalTextMap;
use lexfill_domain::{Placeholder, PlaceholderRegistry};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\[\s*[_\-\x{2014}]{3,}\s*\]|\$?\[[^\[\]]+\]").unwrap());

/// Label given to `$[___]` blanks
pub const AMOUNT_BLANK_LABEL: &str = "Amount";

/// Label given to `[___]` blanks
pub const PLAIN_BLANK_LABEL: &str = "Blank";

/// A token matched in logical text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    /// Byte range in the logical text
    pub range: Range<usize>,
    /// Token text exactly as it appears
    pub literal: &'t str,
    /// Human label derived from the literal
    pub label: String,
}

/// Find every placeholder token in `text`, left to right
pub fn find_tokens(text: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN_RE.find_iter(text).filter_map(|m| {
        let label = token_label(m.as_str())?;
        Some(Token {
            range: m.range(),
            literal: m.as_str(),
            label,
        })
    })
}

/// Derive the label of a token literal
///
/// Returns `None` for brackets holding only whitespace.
pub fn token_label(literal: &str) -> Option<String> {
    let dollar = literal.starts_with('$');
    let inner = literal
        .trim_start_matches('$')
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    if inner.chars().count() >= 3 && inner.chars().all(is_blank_char) {
        let label = if dollar { AMOUNT_BLANK_LABEL } else { PLAIN_BLANK_LABEL };
        return Some(label.to_string());
    }

    let collapsed = inner.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn is_blank_char(c: char) -> bool {
    matches!(c, '_' | '-' | '\u{2014}')
}

/// Tokens of every paragraph in a part's logical text
///
/// Ranges are offsets into `map.text()`.
pub fn find_part_tokens(map: &LogicalTextMap) -> Vec<Token<'_>> {
    let text = map.text();
    map.paragraph_ranges()
        .into_iter()
        .flat_map(move |paragraph| {
            let offset = paragraph.start;
            find_tokens(&text[paragraph]).map(move |token| Token {
                range: token.range.start + offset..token.range.end + offset,
                ..token
            })
        })
        .collect()
}

/// Slug key for a label: lowercase words joined by underscores
///
/// Punctuation is dropped; a label with no word characters becomes `value`.
pub fn slug(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    let slug = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    if slug.is_empty() {
        "value".to_string()
    } else {
        slug
    }
}

/// Scan parts in order and build the placeholder registry
///
/// Placeholders are listed in first-occurrence order. Tokens with the same
/// label share one placeholder; labels whose slugs collide get `_2`, `_3`
/// suffixes.
pub fn scan_parts(parts: &[XmlPart], context_window: usize) -> PlaceholderRegistry {
    let mut registry = PlaceholderRegistry::new();

    for part in parts {
        let map = LogicalTextMap::build(part);
        let mut found = 0;

        for token in find_part_tokens(&map) {
            found += 1;

            if let Some(existing) = registry.find_by_label_mut(&token.label) {
                existing.occurrences += 1;
                continue;
            }

            let key = unique_key(&registry, &slug(&token.label));
            let kind = classify(token.literal);
            let context = excerpt(map.text(), token.range.clone(), context_window);
            registry.push(Placeholder::new(key, token.label, kind).with_context(context));
        }

        debug!("Scanned {}: {} tokens", part.name(), found);
    }

    registry
}

fn unique_key(registry: &PlaceholderRegistry, base: &str) -> String {
    if registry.get(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| registry.get(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}

/// Up to `window` characters either side of `range`, whitespace collapsed
pub fn excerpt(text: &str, range: Range<usize>, window: usize) -> String {
    let before = &text[..range.start];
    let after = &text[range.end..];

    let start = before
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    let end = after
        .char_indices()
        .nth(window)
        .map(|(i, _)| i)
        .unwrap_or(after.len());

    let raw = format!("{}{}{}", &before[start..], &text[range], &after[..end]);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substitute filled values for their tokens in a plain string
///
/// Tokens without a filled placeholder are left as they are.
pub fn render_filled(text: &str, registry: &PlaceholderRegistry) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let literal = &caps[0];
            token_label(literal)
                .and_then(|label| registry.find_by_label(&label))
                .and_then(|p| p.value.clone())
                .unwrap_or_else(|| literal.to_string())
        })
        .into_owned()
}
