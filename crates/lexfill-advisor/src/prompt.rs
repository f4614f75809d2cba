//! Prompt construction for question rephrasing

use lexfill_domain::{AdvisorRequest, Question};
use serde_json::json;

/// Longest excerpt passed to the model, in characters
pub const MAX_EXCERPT_CHARS: usize = 2800;

/// Most filled values listed as context
pub const MAX_FILLED_CONTEXT: usize = 20;

/// Builds prompts asking a model to reword one question
pub struct PromptBuilder {
    question: Question,
    missing_keys: Vec<String>,
    filled: Vec<(String, String)>,
    excerpt: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder for one question
    pub fn new(question: Question) -> Self {
        Self {
            question,
            missing_keys: Vec::new(),
            filled: Vec::new(),
            excerpt: None,
        }
    }

    /// Builder seeded with everything in an advisor request
    pub fn from_request(request: &AdvisorRequest) -> Self {
        Self::new(request.question.clone())
            .with_missing_keys(request.missing_keys.clone())
            .with_filled(request.filled.clone())
            .with_excerpt(request.excerpt.clone())
    }

    /// Remaining keys in selection order
    pub fn with_missing_keys(mut self, keys: Vec<String>) -> Self {
        self.missing_keys = keys;
        self
    }

    /// Already-filled `(label, value)` pairs
    pub fn with_filled(mut self, filled: Vec<(String, String)>) -> Self {
        self.filled = filled;
        self
    }

    /// Text around the placeholder
    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = excerpt;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\n");

        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            prompt.push_str("Surrounding document text (excerpted):\n---\n");
            prompt.push_str(&shorten(excerpt, MAX_EXCERPT_CHARS));
            prompt.push_str("\n---\n\n");
        }

        if !self.filled.is_empty() {
            prompt.push_str("Already filled values:\n");
            for (label, value) in self.filled.iter().take(MAX_FILLED_CONTEXT) {
                prompt.push_str(&format!("- {}: {}\n", label, value));
            }
            prompt.push('\n');
        }

        let placeholder = json!({
            "key": self.question.key,
            "label": self.question.label,
            "type": self.question.kind.as_str(),
            "question": self.question.question,
            "examples": self.question.examples,
        });
        prompt.push_str(&format!("Next placeholder to ask for:\n{:#}\n\n", placeholder));

        if !self.missing_keys.is_empty() {
            prompt.push_str(&format!(
                "Remaining missing keys (ordered by priority): {}\n\n",
                self.missing_keys.join(", ")
            ));
        }

        prompt.push_str(&OUTPUT_FORMAT.replace("{key}", &self.question.key));
        prompt
    }
}

/// Keep the head and tail of long text
fn shorten(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let half = max_chars / 2;
    let head: String = text.chars().take(half).collect();
    let tail: String = text.chars().skip(total - half).collect();
    format!("{}\n...\n{}", head, tail)
}

const INSTRUCTIONS: &str = r#"Rewrite ONE question that asks a user to fill a missing field in a legal agreement template.
Rules:
- Keep it concise, formal but friendly, and unambiguous
- Ask about the placeholder given below and no other
- Provide 1-3 concrete example answers in the format the field expects
- Never invent facts about the parties; a suggestion must come from the filled values"#;

const OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{
  "key": "{key}",
  "question": "<one clear question>",
  "examples": ["<ex1>", "<ex2>"],
  "suggestion": "<optional default value, else null>"
}"#;
