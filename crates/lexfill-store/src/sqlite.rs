//! SQLite session store

use crate::{unix_now, StoreError};
use lexfill_domain::traits::SessionStore;
use lexfill_domain::{PlaceholderRegistry, Session, SessionId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// SQLite-based implementation of SessionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values of one row, decoded outside the row closure
type SessionRow = (Vec<u8>, i64, Option<i64>, String, Vec<u8>, Option<Vec<u8>>);

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn id_to_bytes(id: SessionId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<SessionId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for SessionId, got {}", bytes.len()))
        })?;
        Ok(SessionId::from_value(u128::from_be_bytes(arr)))
    }

    /// Load a session as of `now`
    ///
    /// Returns [`StoreError::Expired`] for a session past its expiry.
    pub fn load_at(&self, id: SessionId, now: u64) -> Result<Option<Session>, StoreError> {
        let row: Option<SessionRow> = self
            .conn
            .query_row(
                "SELECT id, created_at, expires_at, registry, original, filled
                 FROM sessions WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id_bytes, created_at, expires_at, registry, original, filled)) = row else {
            return Ok(None);
        };

        let registry: PlaceholderRegistry = serde_json::from_str(&registry)?;
        let session = Session {
            id: Self::bytes_to_id(&id_bytes)?,
            created_at: created_at as u64,
            expires_at: expires_at.map(|t| t as u64),
            original,
            filled,
            registry,
        };

        if session.is_expired(now) {
            return Err(StoreError::Expired(id));
        }
        Ok(Some(session))
    }

    /// Number of stored sessions, expired ones included
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl SessionStore for SqliteStore {
    type Error = StoreError;

    fn create(&mut self, session: &Session) -> Result<SessionId, Self::Error> {
        let id_bytes = Self::id_to_bytes(session.id);

        let exists = self
            .conn
            .query_row("SELECT 1 FROM sessions WHERE id = ?1", params![&id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(session.id));
        }

        self.conn.execute(
            "INSERT INTO sessions (id, created_at, expires_at, registry, original, filled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &id_bytes,
                session.created_at as i64,
                session.expires_at.map(|t| t as i64),
                serde_json::to_string(&session.registry)?,
                &session.original,
                &session.filled,
            ],
        )?;

        debug!(session = %session.id, "created session");
        Ok(session.id)
    }

    fn load(&self, id: SessionId) -> Result<Option<Session>, Self::Error> {
        self.load_at(id, unix_now())
    }

    fn save(&mut self, session: &Session) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE sessions SET expires_at = ?2, registry = ?3, filled = ?4 WHERE id = ?1",
            params![
                Self::id_to_bytes(session.id),
                session.expires_at.map(|t| t as i64),
                serde_json::to_string(&session.registry)?,
                &session.filled,
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(session.id));
        }
        debug!(session = %session.id, "saved session");
        Ok(())
    }

    fn delete(&mut self, id: SessionId) -> Result<bool, Self::Error> {
        let deleted = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![Self::id_to_bytes(id)])?;
        Ok(deleted > 0)
    }

    fn purge_expired(&mut self, now: u64) -> Result<usize, Self::Error> {
        let purged = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            params![now as i64],
        )?;
        debug!(purged, "purged expired sessions");
        Ok(purged)
    }
}
