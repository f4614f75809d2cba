//! Directory-per-session store

use crate::{unix_now, StoreError};
use lexfill_domain::traits::SessionStore;
use lexfill_domain::{PlaceholderRegistry, Session, SessionId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const METADATA_FILE: &str = "session.json";
const ORIGINAL_FILE: &str = "original.docx";
const FILLED_FILE: &str = "filled.docx";

/// Contents of `session.json`
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    id: String,
    created_at: u64,
    #[serde(default)]
    expires_at: Option<u64>,
    placeholders: PlaceholderRegistry,
}

/// File-based implementation of SessionStore
///
/// Layout: `<root>/<session id>/{session.json, original.docx, filled.docx}`.
/// Every file is written to a temporary name first and renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, id: SessionId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn write_session(&self, dir: &Path, session: &Session, with_original: bool) -> Result<(), StoreError> {
        if with_original {
            Self::write_atomic(&dir.join(ORIGINAL_FILE), &session.original)?;
        }

        let filled = dir.join(FILLED_FILE);
        match &session.filled {
            Some(bytes) => Self::write_atomic(&filled, bytes)?,
            None => match fs::remove_file(&filled) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }

        // Metadata last: a directory without it is not a session yet
        let record = SessionRecord {
            id: session.id.to_string(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            placeholders: session.registry.clone(),
        };
        Self::write_atomic(&dir.join(METADATA_FILE), &serde_json::to_vec_pretty(&record)?)
    }

    fn read_record(dir: &Path) -> Result<Option<SessionRecord>, StoreError> {
        match fs::read(dir.join(METADATA_FILE)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a session as of `now`
    ///
    /// Returns [`StoreError::Expired`] for a session past its expiry.
    pub fn load_at(&self, id: SessionId, now: u64) -> Result<Option<Session>, StoreError> {
        let dir = self.session_dir(id);
        let Some(record) = Self::read_record(&dir)? else {
            return Ok(None);
        };

        let stored_id = SessionId::from_string(&record.id).map_err(StoreError::InvalidData)?;
        if stored_id != id {
            return Err(StoreError::InvalidData(format!(
                "{} holds metadata for session {}",
                dir.display(),
                stored_id
            )));
        }
        if record.expires_at.is_some_and(|at| now >= at) {
            return Err(StoreError::Expired(id));
        }

        let original = fs::read(dir.join(ORIGINAL_FILE))?;
        let filled = match fs::read(dir.join(FILLED_FILE)) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Some(Session {
            id,
            created_at: record.created_at,
            expires_at: record.expires_at,
            original,
            filled,
            registry: record.placeholders,
        }))
    }
}

impl SessionStore for FileStore {
    type Error = StoreError;

    fn create(&mut self, session: &Session) -> Result<SessionId, Self::Error> {
        let dir = self.session_dir(session.id);
        if dir.join(METADATA_FILE).exists() {
            return Err(StoreError::Duplicate(session.id));
        }
        fs::create_dir_all(&dir)?;
        self.write_session(&dir, session, true)?;

        debug!(session = %session.id, dir = %dir.display(), "created session");
        Ok(session.id)
    }

    fn load(&self, id: SessionId) -> Result<Option<Session>, Self::Error> {
        self.load_at(id, unix_now())
    }

    fn save(&mut self, session: &Session) -> Result<(), Self::Error> {
        let dir = self.session_dir(session.id);
        if !dir.join(METADATA_FILE).exists() {
            return Err(StoreError::NotFound(session.id));
        }
        self.write_session(&dir, session, false)?;

        debug!(session = %session.id, "saved session");
        Ok(())
    }

    fn delete(&mut self, id: SessionId) -> Result<bool, Self::Error> {
        match fs::remove_dir_all(self.session_dir(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn purge_expired(&mut self, now: u64) -> Result<usize, Self::Error> {
        let mut purged = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let record = match Self::read_record(&path) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!(dir = %path.display(), error = %e, "skipping unreadable session");
                    continue;
                }
            };
            if record.expires_at.is_some_and(|at| now >= at) {
                fs::remove_dir_all(&path)?;
                purged += 1;
            }
        }
        debug!(purged, "purged expired sessions");
        Ok(purged)
    }
}
