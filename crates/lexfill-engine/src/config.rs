//! Configuration for the placeholder engine

use lexfill_domain::PlaceholderKind;
use serde::{Deserialize, Serialize};

/// Configuration for the placeholder engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Order in which missing placeholder kinds are asked about
    pub type_priority: Vec<PlaceholderKind>,

    /// Characters of surrounding text captured on each side of a placeholder
    pub context_window: usize,

    /// Largest uncompressed text-bearing part accepted (bytes)
    pub max_part_bytes: u64,
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_part_bytes == 0 {
            return Err("max_part_bytes must be greater than 0".to_string());
        }
        for (i, kind) in self.type_priority.iter().enumerate() {
            if self.type_priority[..i].contains(kind) {
                return Err(format!("type_priority lists '{}' more than once", kind));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            type_priority: vec![
                PlaceholderKind::Name,
                PlaceholderKind::Date,
                PlaceholderKind::Currency,
                PlaceholderKind::Jurisdiction,
                PlaceholderKind::String,
            ],
            context_window: 120,
            max_part_bytes: 32 * 1024 * 1024,
        }
    }
}
