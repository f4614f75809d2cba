//! Registry module - the ordered placeholder set of one session

use crate::placeholder::{Placeholder, PlaceholderKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A key that is not present in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placeholder key '{}' not found", self.0)
    }
}

impl std::error::Error for UnknownKey {}

/// Ordered set of placeholders discovered in a template
///
/// Order is first-occurrence order from the scanner. The registry is created
/// by a scan and afterwards mutated only by value assignment; it is owned by
/// the caller's session and passed into each engine call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderRegistry {
    placeholders: Vec<Placeholder>,
}

impl PlaceholderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placeholder
    ///
    /// Keys must be unique; the scanner guarantees this.
    pub fn push(&mut self, placeholder: Placeholder) {
        debug_assert!(self.get(&placeholder.key).is_none());
        self.placeholders.push(placeholder);
    }

    /// Number of placeholders
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    /// Whether the template had no placeholders
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Iterate in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter()
    }

    /// All placeholders as a slice
    pub fn as_slice(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Position of a key in first-occurrence order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.placeholders.iter().position(|p| p.key == key)
    }

    /// Look up a placeholder by key
    pub fn get(&self, key: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.key == key)
    }

    /// Look up a placeholder by its exact label text
    pub fn find_by_label(&self, label: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.label == label)
    }

    /// Mutable lookup by exact label text
    pub fn find_by_label_mut(&mut self, label: &str) -> Option<&mut Placeholder> {
        self.placeholders.iter_mut().find(|p| p.label == label)
    }

    /// Assign a canonical value to a key
    pub fn assign(&mut self, key: &str, value: impl Into<String>) -> Result<(), UnknownKey> {
        let placeholder = self
            .placeholders
            .iter_mut()
            .find(|p| p.key == key)
            .ok_or_else(|| UnknownKey(key.to_string()))?;
        placeholder.value = Some(value.into());
        Ok(())
    }

    /// Placeholders without a value, in first-occurrence order
    pub fn missing(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter().filter(|p| !p.is_filled())
    }

    /// Placeholders with a value, in first-occurrence order
    pub fn filled(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter().filter(|p| p.is_filled())
    }

    /// Filled placeholders of one kind
    pub fn filled_of_kind(&self, kind: PlaceholderKind) -> impl Iterator<Item = &Placeholder> {
        self.filled().filter(move |p| p.kind == kind)
    }

    /// Number of placeholders still missing a value
    pub fn remaining_count(&self) -> usize {
        self.missing().count()
    }

    /// Whether every placeholder has a value
    pub fn is_complete(&self) -> bool {
        self.remaining_count() == 0
    }
}

impl FromIterator<Placeholder> for PlaceholderRegistry {
    fn from_iter<I: IntoIterator<Item = Placeholder>>(iter: I) -> Self {
        Self {
            placeholders: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlaceholderRegistry {
    type Item = &'a Placeholder;
    type IntoIter = std::slice::Iter<'a, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.placeholders.iter()
    }
}
