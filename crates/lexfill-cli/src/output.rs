//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lexfill_domain::{NextQuestion, PlaceholderRegistry, SessionId};
use lexfill_engine::{ExportSummary, FailureRecord, FillOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest context excerpt shown in the table view
const CONTEXT_PREVIEW_CHARS: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a session's placeholders.
    pub fn format_registry(&self, registry: &PlaceholderRegistry) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(registry)?),
            OutputFormat::Table => Ok(self.format_registry_table(registry)),
            OutputFormat::Quiet => Ok(registry
                .iter()
                .map(|p| p.key.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_registry_table(&self, registry: &PlaceholderRegistry) -> String {
        if registry.is_empty() {
            return self.colorize("No placeholders found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Key", "Label", "Type", "Count", "Value", "Context"]);

        for placeholder in registry.iter() {
            let value = match &placeholder.value {
                Some(value) => value.clone(),
                None => self.colorize("(missing)", "yellow"),
            };
            let context = placeholder
                .context
                .as_deref()
                .map(|c| truncate(c, CONTEXT_PREVIEW_CHARS))
                .unwrap_or_default();
            builder.push_record([
                placeholder.key.clone(),
                placeholder.label.clone(),
                placeholder.kind.to_string(),
                placeholder.occurrences.to_string(),
                value,
                context,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the answer to a next-question query.
    pub fn format_question(&self, next: &NextQuestion) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(next)?),
            OutputFormat::Quiet => Ok(next
                .next
                .as_ref()
                .map(|q| q.key.clone())
                .unwrap_or_default()),
            OutputFormat::Table => {
                let Some(question) = &next.next else {
                    return Ok(self.success("All placeholders are filled."));
                };
                let mut out = format!(
                    "{} {}\n",
                    self.colorize(&format!("[{}]", question.key), "cyan"),
                    question.question
                );
                if !question.examples.is_empty() {
                    out.push_str(&format!("  e.g. {}\n", question.examples.join(" | ")));
                }
                if let Some(suggestion) = &question.suggestion {
                    out.push_str(&format!("  suggested: {}\n", suggestion));
                }
                out.push_str(&format!("  {} remaining", next.remaining_count));
                Ok(out)
            }
        }
    }

    /// Format a successful fill.
    pub fn format_fill(&self, outcome: &FillOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(outcome.normalized_value.clone()),
            OutputFormat::Table => Ok(self.success(&format!(
                "{} = {} ({} remaining)",
                outcome.key, outcome.normalized_value, outcome.remaining
            ))),
        }
    }

    /// Format a rejected fill.
    pub fn format_failure(&self, failure: &FailureRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(failure)?),
            OutputFormat::Quiet => Ok(failure.reason.clone()),
            OutputFormat::Table => {
                let mut out = self.error(&failure.reason);
                if !failure.accepted_examples.is_empty() {
                    out.push_str(&format!("\n  accepted: {}", failure.accepted_examples.join(" | ")));
                }
                Ok(out)
            }
        }
    }

    /// Format an export result.
    pub fn format_export(&self, path: &str, summary: &ExportSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "output": path,
                "summary": summary,
            }))?),
            OutputFormat::Quiet => Ok(path.to_string()),
            OutputFormat::Table => {
                let mut out = self.success(&format!(
                    "Wrote {} ({} replacement(s) in {} part(s))",
                    path,
                    summary.occurrences,
                    summary.parts_changed.len()
                ));
                if summary.unfilled > 0 {
                    out.push('\n');
                    out.push_str(&self.warning(&format!(
                        "{} placeholder(s) left unfilled",
                        summary.unfilled
                    )));
                }
                Ok(out)
            }
        }
    }

    /// Format a newly created session.
    pub fn session_created(&self, id: SessionId, registry: &PlaceholderRegistry) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "session": id.to_string(),
                "placeholders": registry,
            }))?),
            OutputFormat::Quiet => Ok(id.to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.success(&format!("Session {} ({} placeholder(s))", id, registry.len())),
                self.format_registry_table(registry)
            )),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}
