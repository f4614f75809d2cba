//! Core PlaceholderEngine implementation

use crate::archive::DocxArchive;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::normalizer::normalize;
use crate::replacer::{replace_all, verify_written};
use crate::scanner::{render_filled, scan_parts};
use crate::selector::QuestionSelector;
use crate::types::{ExportSummary, FillOutcome};
use lexfill_domain::traits::TextAdvisor;
use lexfill_domain::{AdvisorRequest, NextQuestion, PlaceholderRegistry, Question};
use std::fmt;
use tracing::{debug, info, warn};

/// Stateless facade over scanning, filling, selection and export
///
/// The engine never holds a registry or document between calls: callers
/// pass the template bytes and their registry each time and keep the
/// results.
#[derive(Debug, Clone)]
pub struct PlaceholderEngine {
    config: EngineConfig,
    selector: QuestionSelector,
}

impl PlaceholderEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        let selector = QuestionSelector::from_config(&config);
        Ok(Self { config, selector })
    }

    /// Create an engine with default configuration
    pub fn default_config() -> Self {
        let config = EngineConfig::default();
        let selector = QuestionSelector::from_config(&config);
        Self { config, selector }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Discover the placeholders in a template
    pub fn scan(&self, template: &[u8]) -> Result<PlaceholderRegistry, EngineError> {
        let archive = DocxArchive::open(template, self.config.max_part_bytes)?;
        let registry = scan_parts(archive.parts(), self.config.context_window);
        info!(
            "Scanned {} parts: {} placeholders, {} occurrences",
            archive.parts().len(),
            registry.len(),
            registry.iter().map(|p| p.occurrences).sum::<usize>()
        );
        Ok(registry)
    }

    /// Normalize and record a value
    ///
    /// The registry is only changed when the key exists and the value
    /// normalizes.
    pub fn fill(
        &self,
        registry: &mut PlaceholderRegistry,
        key: &str,
        raw_value: &str,
    ) -> Result<FillOutcome, EngineError> {
        let placeholder = registry
            .get(key)
            .ok_or_else(|| EngineError::UnknownKey(key.to_string()))?;

        let normalized = normalize(placeholder.kind, raw_value)
            .inspect_err(|e| debug!("Rejected value for '{}': {}", key, e))?;

        registry.assign(key, normalized.clone())?;
        let remaining = registry.remaining_count();
        info!("Filled '{}' ({} remaining)", key, remaining);

        Ok(FillOutcome {
            key: key.to_string(),
            normalized_value: normalized,
            remaining,
        })
    }

    /// Deterministic next question
    pub fn next_question(&self, registry: &PlaceholderRegistry) -> NextQuestion {
        self.selector.next(registry)
    }

    /// Deterministic question for one key
    pub fn question_for_key(
        &self,
        registry: &PlaceholderRegistry,
        key: &str,
    ) -> Result<Question, EngineError> {
        let placeholder = registry
            .get(key)
            .ok_or_else(|| EngineError::UnknownKey(key.to_string()))?;
        Ok(self.selector.question_for(placeholder, registry))
    }

    /// Next question with wording refined by an advisor
    ///
    /// The selected key never changes. If the advisor fails, the
    /// deterministic question is returned as is.
    pub fn ask_with<A>(&self, registry: &PlaceholderRegistry, advisor: &A) -> NextQuestion
    where
        A: TextAdvisor,
        A::Error: fmt::Display,
    {
        let mut next = self.next_question(registry);
        let Some(question) = next.next.take() else {
            return next;
        };

        let request = AdvisorRequest {
            excerpt: registry.get(&question.key).and_then(|p| p.context.clone()),
            missing_keys: next.missing_keys.clone(),
            filled: registry
                .filled()
                .filter_map(|p| p.value.clone().map(|v| (p.label.clone(), v)))
                .collect(),
            question: question.clone(),
        };

        next.next = Some(match advisor.refine(&request) {
            Ok(refinement) => question.refined(refinement),
            Err(e) => {
                warn!("Advisor failed for '{}', using deterministic wording: {}", question.key, e);
                question
            }
        });
        next
    }

    /// Write every filled value into a copy of the template
    pub fn export(
        &self,
        template: &[u8],
        registry: &PlaceholderRegistry,
    ) -> Result<Vec<u8>, EngineError> {
        self.export_with_summary(template, registry).map(|(bytes, _)| bytes)
    }

    /// Export and report what changed
    ///
    /// The template slice is never modified. The returned bytes exist only
    /// once every occurrence was rewritten and the rewritten package has been
    /// re-read and checked.
    pub fn export_with_summary(
        &self,
        template: &[u8],
        registry: &PlaceholderRegistry,
    ) -> Result<(Vec<u8>, ExportSummary), EngineError> {
        let mut archive = DocxArchive::open(template, self.config.max_part_bytes)?;
        let report = replace_all(&mut archive, registry)?;
        let written = archive.write()?;
        verify_written(&written, &report, self.config.max_part_bytes)?;

        let filled = registry.filled().count();
        let summary = ExportSummary {
            occurrences: report.occurrences,
            parts_changed: report.expected.iter().map(|(name, _)| name.clone()).collect(),
            filled,
            unfilled: registry.len() - filled,
        };
        info!(
            "Exported {} occurrences across {} parts",
            summary.occurrences,
            summary.parts_changed.len()
        );
        Ok((written, summary))
    }

    /// Main body as plain text, one line per paragraph, values substituted
    pub fn preview(
        &self,
        template: &[u8],
        registry: &PlaceholderRegistry,
    ) -> Result<String, EngineError> {
        let archive = DocxArchive::open(template, self.config.max_part_bytes)?;
        let body = archive
            .body()
            .ok_or_else(|| EngineError::MalformedArchive("missing main document".to_string()))?;

        let lines: Vec<String> = body
            .paragraph_texts()
            .iter()
            .map(|text| render_filled(text, registry))
            .collect();
        Ok(lines.join("\n"))
    }
}

impl Default for PlaceholderEngine {
    fn default() -> Self {
        Self::default_config()
    }
}
