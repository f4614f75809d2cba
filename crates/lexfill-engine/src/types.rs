//! Request and response types for engine calls

use serde::{Deserialize, Serialize};

/// Result of a successful value submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Key that was filled
    pub key: String,

    /// Canonical value stored in the registry
    pub normalized_value: String,

    /// Placeholders still without a value
    pub remaining: usize,
}

/// Structured failure for a rejected value submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Key the value was submitted for
    pub key: String,

    /// Why the value was rejected
    pub reason: String,

    /// Inputs that would have been accepted
    pub accepted_examples: Vec<String>,
}

/// Summary of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Token occurrences rewritten
    pub occurrences: usize,

    /// Archive members whose text changed
    pub parts_changed: Vec<String>,

    /// Filled placeholders written
    pub filled: usize,

    /// Placeholders left as tokens
    pub unfilled: usize,
}
