//! Everything a command needs: engine, session store, optional advisor.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexfill_advisor::{ConfiguredProvider, LlmAdvisor};
use lexfill_domain::traits::SessionStore;
use lexfill_domain::{NextQuestion, PlaceholderRegistry, Session, SessionId};
use lexfill_engine::PlaceholderEngine;
use lexfill_store::{open_store, AnyStore};
use tracing::{debug, warn};

/// Shared state for one CLI invocation.
pub struct App {
    /// Placeholder engine
    pub engine: PlaceholderEngine,
    /// Session store
    pub store: AnyStore,
    /// Output formatter
    pub formatter: Formatter,
    advisor: Option<LlmAdvisor<ConfiguredProvider>>,
    retention_secs: Option<u64>,
}

impl App {
    /// Build the engine, open the store and, if enabled, the advisor.
    ///
    /// An advisor that cannot be built is logged and left out.
    pub fn new(config: &Config, formatter: Formatter) -> Result<Self> {
        let engine = PlaceholderEngine::new(config.engine.clone())?;
        let store = open_store(&config.store)?;
        debug!(backend = %store.backend(), "session store ready");

        let advisor = match config.advisor.build_provider() {
            Ok(provider) => provider.map(LlmAdvisor::new),
            Err(e) => {
                warn!(error = %e, "text advisor unavailable, using deterministic questions");
                None
            }
        };

        Ok(Self {
            engine,
            store,
            formatter,
            advisor,
            retention_secs: config.store.retention_secs(),
        })
    }

    /// Default retention for new sessions, in seconds.
    pub fn retention_secs(&self) -> Option<u64> {
        self.retention_secs
    }

    /// Load a session by its string ID.
    pub fn load_session(&self, id: &str) -> Result<Session> {
        let session_id = SessionId::from_string(id).map_err(CliError::InvalidInput)?;
        self.store
            .load(session_id)?
            .ok_or_else(|| CliError::SessionNotFound(id.to_string()))
    }

    /// Persist a modified session.
    pub fn save_session(&mut self, session: &Session) -> Result<()> {
        self.store.save(session)?;
        Ok(())
    }

    /// The next question, reworded by the advisor when one is configured.
    pub fn next_question(&self, registry: &PlaceholderRegistry) -> NextQuestion {
        match &self.advisor {
            Some(advisor) => self.engine.ask_with(registry, advisor),
            None => self.engine.next_question(registry),
        }
    }
}
