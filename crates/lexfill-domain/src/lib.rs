//! Lexfill Domain Layer
//!
//! This crate holds the model shared by every other layer of lexfill: the
//! placeholders discovered in a contract template, the registry that tracks
//! which of them have values, the question records handed to callers, and
//! the trait seams for the collaborators the engine consumes.
//!
//! ## Key Concepts
//!
//! - **Placeholder**: a bracketed or underscore-blank token in a template,
//!   identified by a stable key derived from its label
//! - **Registry**: the ordered set of placeholders of one session
//! - **Question**: the deterministic prompt for the next missing placeholder
//! - **Session**: the template bytes, the last filled export and the registry
//!
//! ## Architecture
//!
//! - No I/O and no document handling
//! - Trait definitions for all external interactions (storage, text advice)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod placeholder;
pub mod question;
pub mod registry;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use placeholder::{Placeholder, PlaceholderKind};
pub use question::{AdvisorRequest, NextQuestion, Question, QuestionRefinement, QuestionSource};
pub use registry::{PlaceholderRegistry, UnknownKey};
pub use session::{Session, SessionId};
