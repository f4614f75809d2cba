//! Session module - the caller-owned state the engine operates on

use crate::registry::PlaceholderRegistry;
use std::fmt;

/// Unique identifier for a session based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which the stores use
/// to list and expire sessions in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u128);

impl SessionId {
    /// Generate a new UUIDv7-based SessionId
    ///
    /// # Examples
    ///
    /// ```
    /// use lexfill_domain::SessionId;
    ///
    /// let id = SessionId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a SessionId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a SessionId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use lexfill_domain::SessionId;
    ///
    /// let id = SessionId::new();
    /// let parsed = SessionId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid session id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Millisecond timestamp embedded in the UUIDv7
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// One template-filling session
///
/// `original` is the uploaded template and is never modified. `filled` holds
/// the bytes of the last export that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// When the session falls out of the retention window
    pub expires_at: Option<u64>,

    /// Template bytes as uploaded
    pub original: Vec<u8>,

    /// Last successful export
    pub filled: Option<Vec<u8>>,

    /// Placeholders and their values
    pub registry: PlaceholderRegistry,
}

impl Session {
    /// Create a session for a freshly scanned template
    pub fn new(original: Vec<u8>, registry: PlaceholderRegistry, created_at: u64) -> Self {
        Self {
            id: SessionId::new(),
            created_at,
            expires_at: None,
            original,
            filled: None,
            registry,
        }
    }

    /// Set the retention window, in seconds from creation
    pub fn with_retention(mut self, retention_secs: Option<u64>) -> Self {
        self.expires_at = retention_secs.map(|secs| self.created_at.saturating_add(secs));
        self
    }

    /// Whether the session is past its retention window at `now`
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_ordering() {
        let id1 = SessionId::from_value(1000);
        let id2 = SessionId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_session_id_invalid_string() {
        assert!(SessionId::from_string("not-a-valid-uuid").is_err());
        assert!(SessionId::from_string("").is_err());
    }

    #[test]
    fn test_retention_window() {
        let session = Session::new(vec![], PlaceholderRegistry::new(), 1_000).with_retention(Some(60));
        assert_eq!(session.expires_at, Some(1_060));
        assert!(!session.is_expired(1_059));
        assert!(session.is_expired(1_060));

        let forever = Session::new(vec![], PlaceholderRegistry::new(), 1_000).with_retention(None);
        assert!(!forever.is_expired(u64::MAX));
    }
}
