//! Lexfill Engine
//!
//! Finds bracketed placeholders in word-processing templates, normalizes the
//! values supplied for them, and writes those values back without
//! disturbing the rest of the package.
//!
//! # Overview
//!
//! A template is a zip package of XML parts. Word freely splits one visible
//! string across several runs, so `[Company Name]` may be stored as
//! `[Com`, `pany Na`, `me]` under three different formatting contexts. The
//! engine flattens each part into a logical text map, finds tokens in the
//! flattened text, and maps matches back onto the runs they touch.
//!
//! # Architecture
//!
//! ```text
//! bytes → DocxArchive → XmlPart runs → LogicalTextMap
//!                                     ├→ Scanner + Classifier → PlaceholderRegistry
//!                                     └→ Replacer (filled registry) → bytes
//! raw value → Normalizer → registry       registry → QuestionSelector → NextQuestion
//! ```
//!
//! # Key Features
//!
//! - **Split-run safety**: tokens are matched independently of run boundaries
//! - **Minimal edits**: only runs a token touches are rewritten; every other
//!   byte of the part and every other archive member is copied unchanged
//! - **Typed normalization**: currency and date inputs reduced to one
//!   canonical form, with accepted examples on rejection
//! - **Deterministic selection**: the next question depends only on the
//!   registry and the configured kind priority
//! - **Transactional export**: output exists only after every occurrence was
//!   replaced and the rewritten package re-read and checked
//!
//! # Example Usage
//!
//! ```no_run
//! use lexfill_engine::{EngineConfig, PlaceholderEngine};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = PlaceholderEngine::new(EngineConfig::default())?;
//! let template = std::fs::read("safe.docx")?;
//!
//! let mut registry = engine.scan(&template)?;
//! while let Some(question) = engine.next_question(&registry).next {
//!     println!("{}", question.question);
//!     let answer = question.examples.first().cloned().unwrap_or_default();
//!     engine.fill(&mut registry, &question.key, &answer)?;
//! }
//!
//! let filled = engine.export(&template, &registry)?;
//! std::fs::write("safe-filled.docx", filled)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod engine;
mod error;
mod types;

pub mod archive;
pub mod classifier;
pub mod normalizer;
pub mod part;
pub mod replacer;
pub mod scanner;
pub mod selector;
pub mod text_map;

#[cfg(test)]
mod tests;

pub use archive::{DocxArchive, PartKind, MAIN_DOCUMENT};
pub use config::EngineConfig;
pub use engine::PlaceholderEngine;
pub use error::{EngineError, NormalizationError};
pub use normalizer::{accepted_examples, normalize};
pub use part::{TextRun, XmlPart};
pub use selector::QuestionSelector;
pub use text_map::LogicalTextMap;
pub use types::{ExportSummary, FailureRecord, FillOutcome};
