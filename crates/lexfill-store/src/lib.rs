//! Lexfill Storage Layer
//!
//! Implements the `SessionStore` trait for template-filling sessions.
//!
//! # Architecture
//!
//! - `SqliteStore`: one row per session; registry as JSON, documents as blobs
//! - `FileStore`: one directory per session holding `session.json`,
//!   `original.docx` and, after an export, `filled.docx`
//! - `open_store`: opens the configured backend and, when allowed, falls back
//!   from SQLite to the file store so callers never see the difference
//!
//! Sessions carry an optional expiry. Loading an expired session fails with
//! [`StoreError::Expired`]; `purge_expired` deletes them.
//!
//! # Examples
//!
//! ```no_run
//! use lexfill_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for session operations
//! ```

#![warn(missing_docs)]

mod config;
mod file;
mod sqlite;

use lexfill_domain::traits::SessionStore;
use lexfill_domain::{Session, SessionId};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};

pub use config::{Backend, StoreConfig};
pub use file::FileStore;
pub use sqlite::SqliteStore;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "lexfill.db";

/// Session directory name inside the data directory
pub const SESSIONS_DIR: &str = "sessions";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session not found
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// Session is past its retention window
    #[error("Session expired: {0}")]
    Expired(SessionId),

    /// A session with this ID already exists
    #[error("Session already exists: {0}")]
    Duplicate(SessionId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Current time in seconds since the Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Whichever backend `open_store` ended up with
pub enum AnyStore {
    /// SQLite database
    Sqlite(SqliteStore),
    /// Directory of session folders
    File(FileStore),
}

impl AnyStore {
    /// The backend in use
    pub fn backend(&self) -> Backend {
        match self {
            Self::Sqlite(_) => Backend::Sqlite,
            Self::File(_) => Backend::File,
        }
    }

    /// Load a session as of `now`
    pub fn load_at(&self, id: SessionId, now: u64) -> Result<Option<Session>, StoreError> {
        match self {
            Self::Sqlite(store) => store.load_at(id, now),
            Self::File(store) => store.load_at(id, now),
        }
    }
}

impl SessionStore for AnyStore {
    type Error = StoreError;

    fn create(&mut self, session: &Session) -> Result<SessionId, Self::Error> {
        match self {
            Self::Sqlite(store) => store.create(session),
            Self::File(store) => store.create(session),
        }
    }

    fn load(&self, id: SessionId) -> Result<Option<Session>, Self::Error> {
        self.load_at(id, unix_now())
    }

    fn save(&mut self, session: &Session) -> Result<(), Self::Error> {
        match self {
            Self::Sqlite(store) => store.save(session),
            Self::File(store) => store.save(session),
        }
    }

    fn delete(&mut self, id: SessionId) -> Result<bool, Self::Error> {
        match self {
            Self::Sqlite(store) => store.delete(id),
            Self::File(store) => store.delete(id),
        }
    }

    fn purge_expired(&mut self, now: u64) -> Result<usize, Self::Error> {
        match self {
            Self::Sqlite(store) => store.purge_expired(now),
            Self::File(store) => store.purge_expired(now),
        }
    }
}

/// Open the configured backend
///
/// When the SQLite database cannot be opened and `allow_fallback` is set,
/// the file store under the same data directory is used instead.
pub fn open_store(config: &StoreConfig) -> Result<AnyStore, StoreError> {
    config.validate().map_err(StoreError::Config)?;
    std::fs::create_dir_all(&config.data_dir)?;

    match config.backend {
        Backend::File => {
            let store = FileStore::new(config.data_dir.join(SESSIONS_DIR))?;
            info!(dir = %config.data_dir.display(), "using file session store");
            Ok(AnyStore::File(store))
        }
        Backend::Sqlite => match SqliteStore::new(config.data_dir.join(DATABASE_FILE)) {
            Ok(store) => {
                info!(dir = %config.data_dir.display(), "using sqlite session store");
                Ok(AnyStore::Sqlite(store))
            }
            Err(e) if config.allow_fallback => {
                warn!(error = %e, "sqlite store unavailable, falling back to file store");
                Ok(AnyStore::File(FileStore::new(config.data_dir.join(SESSIONS_DIR))?))
            }
            Err(e) => Err(e),
        },
    }
}
