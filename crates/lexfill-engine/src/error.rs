//! Error types for the placeholder engine

use crate::types::FailureRecord;
use lexfill_domain::{PlaceholderKind, UnknownKey};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Required document parts are missing or unreadable
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// A fill or ask referenced a key absent from the registry
    #[error("Placeholder key '{0}' not found")]
    UnknownKey(String),

    /// A submitted value could not be normalized
    #[error("{0}")]
    Normalization(NormalizationError),

    /// The logical text map stopped matching the document during replacement
    #[error("Replacement consistency error in {part}: {detail}")]
    ReplacementConsistency {
        /// Archive member being rewritten
        part: String,
        /// What went out of step
        detail: String,
    },

    /// XML decoding error inside a text-bearing part
    #[error("XML error in {part}: {detail}")]
    Xml {
        /// Archive member being read
        part: String,
        /// Parser message
        detail: String,
    },

    /// Zip container error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while reading or writing archive members
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether the caller can recover by re-prompting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Normalization(_) | EngineError::UnknownKey(_))
    }

    /// Whether this error means the archive itself is unusable
    pub fn is_malformed_archive(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedArchive(_)
                | EngineError::Xml { .. }
                | EngineError::Archive(_)
                | EngineError::Io(_)
        )
    }

    /// The caller-facing failure record for a rejected submission
    ///
    /// Only normalization and unknown-key errors have one.
    pub fn failure_record(&self, key: &str) -> Option<FailureRecord> {
        match self {
            EngineError::Normalization(e) => Some(FailureRecord {
                key: key.to_string(),
                reason: e.to_string(),
                accepted_examples: e.accepted_examples.clone(),
            }),
            EngineError::UnknownKey(_) => Some(FailureRecord {
                key: key.to_string(),
                reason: self.to_string(),
                accepted_examples: Vec::new(),
            }),
            _ => None,
        }
    }

    pub(crate) fn consistency(part: &str, detail: impl Into<String>) -> Self {
        EngineError::ReplacementConsistency {
            part: part.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn xml(part: &str, detail: impl fmt::Display) -> Self {
        EngineError::Xml {
            part: part.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl From<UnknownKey> for EngineError {
    fn from(e: UnknownKey) -> Self {
        EngineError::UnknownKey(e.0)
    }
}

impl From<NormalizationError> for EngineError {
    fn from(e: NormalizationError) -> Self {
        EngineError::Normalization(e)
    }
}

/// A raw value that could not be turned into a canonical form
///
/// Carries the offending input and the formats that would have been
/// accepted, so callers can re-prompt. Nothing is mutated when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationError {
    /// The raw input as submitted
    pub input: String,

    /// The placeholder kind being normalized
    pub kind: PlaceholderKind,

    /// Short reason for the rejection
    pub reason: String,

    /// Example inputs that normalize successfully
    pub accepted_examples: Vec<String>,
}

impl NormalizationError {
    pub(crate) fn new(kind: PlaceholderKind, input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            kind,
            reason: reason.into(),
            accepted_examples: crate::normalizer::accepted_examples(kind)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} '{}': {}", self.kind, self.input, self.reason)
    }
}

impl std::error::Error for NormalizationError {}
