//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the placeholder engine and the
//! collaborators it consumes. Implementations live in other crates.

use crate::question::{AdvisorRequest, QuestionRefinement};
use crate::session::{Session, SessionId};

/// Trait for persisting sessions
///
/// Implemented by the infrastructure layer (lexfill-store). The engine never
/// holds a store; callers load a session, run engine calls against it, and
/// save it back. Callers are responsible for serializing operations on the
/// same session.
pub trait SessionStore {
    /// Error type for store operations
    type Error;

    /// Persist a new session
    fn create(&mut self, session: &Session) -> Result<SessionId, Self::Error>;

    /// Load a session by ID
    fn load(&self, id: SessionId) -> Result<Option<Session>, Self::Error>;

    /// Overwrite an existing session
    fn save(&mut self, session: &Session) -> Result<(), Self::Error>;

    /// Delete a session, returning whether it existed
    fn delete(&mut self, id: SessionId) -> Result<bool, Self::Error>;

    /// Delete every session past its retention window at `now`
    fn purge_expired(&mut self, now: u64) -> Result<usize, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (lexfill-advisor)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for rephrasing the selector's questions
///
/// An advisor only rewrites presentation text. It cannot change which key
/// was selected, and callers fall back to the deterministic wording whenever
/// it returns an error.
pub trait TextAdvisor {
    /// Error type for advisor operations
    type Error;

    /// Propose a rewording for the request's question
    fn refine(&self, request: &AdvisorRequest) -> Result<QuestionRefinement, Self::Error>;
}
