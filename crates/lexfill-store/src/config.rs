//! Configuration for session storage

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single SQLite database file
    #[default]
    Sqlite,
    /// One directory per session
    File,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::File => write!(f, "file"),
        }
    }
}

/// Configuration for session storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Preferred backend
    pub backend: Backend,

    /// Directory holding the database or session folders
    pub data_dir: PathBuf,

    /// Days a session is kept; `None` keeps sessions until deleted
    pub retention_days: Option<u64>,

    /// Use the file store when the SQLite database cannot be opened
    pub allow_fallback: bool,
}

impl StoreConfig {
    /// Retention window in seconds
    pub fn retention_secs(&self) -> Option<u64> {
        self.retention_days.map(|days| days.saturating_mul(SECONDS_PER_DAY))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        if self.retention_days == Some(0) {
            return Err("retention_days must be greater than 0 when set".to_string());
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

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            data_dir: PathBuf::from("./data"),
            retention_days: None,
            allow_fallback: true,
        }
    }
}
