//! Parse model output into a question refinement

use crate::AdvisorError;
use lexfill_domain::QuestionRefinement;
use serde::Deserialize;
use tracing::debug;

/// Most examples kept from a response
pub const MAX_EXAMPLES: usize = 3;

#[derive(Deserialize)]
struct RawRefinement {
    key: String,
    question: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    suggestion: Option<String>,
}

/// Parse a model response for the question about `expected_key`
///
/// The response must be a JSON object (optionally fenced in a markdown code
/// block) naming the same key and carrying a non-empty question.
pub fn parse_refinement(response: &str, expected_key: &str) -> Result<QuestionRefinement, AdvisorError> {
    let json_str = extract_json(response)?;

    let raw: RawRefinement = serde_json::from_str(&json_str)
        .map_err(|e| AdvisorError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    if raw.key != expected_key {
        return Err(AdvisorError::KeyMismatch {
            expected: expected_key.to_string(),
            found: raw.key,
        });
    }

    let question = raw.question.trim();
    if question.is_empty() {
        return Err(AdvisorError::InvalidResponse("Empty question".to_string()));
    }

    let examples: Vec<String> = raw
        .examples
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .take(MAX_EXAMPLES)
        .collect();

    // Models spell "no suggestion" in several ways
    let suggestion = raw
        .suggestion
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null") && !s.eq_ignore_ascii_case("none"));

    debug!(key = expected_key, examples = examples.len(), "parsed advisor refinement");

    Ok(QuestionRefinement {
        question: question.to_string(),
        examples,
        suggestion,
    })
}

/// Extract JSON from response, handling markdown code blocks and chatter
fn extract_json(response: &str) -> Result<String, AdvisorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AdvisorError::InvalidResponse("Empty code block".to_string()));
        }

        // Skip the opening fence line and a closing fence line if present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(AdvisorError::InvalidResponse("No JSON object in response".to_string())),
    }
}
