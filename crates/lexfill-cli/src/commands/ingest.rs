//! Ingest command implementation.

use crate::app::App;
use crate::cli::IngestArgs;
use crate::error::Result;
use lexfill_domain::traits::SessionStore;
use lexfill_domain::Session;
use lexfill_store::unix_now;
use std::fs;
use std::path::Path;
use tracing::info;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Execute the ingest command.
pub fn execute_ingest(args: IngestArgs, app: &mut App) -> Result<()> {
    let retention = args
        .retention_days
        .map(|days| days.saturating_mul(SECONDS_PER_DAY))
        .or(app.retention_secs());
    let session = ingest(app, &args.file, retention)?;

    println!("{}", app.formatter.session_created(session.id, &session.registry)?);
    Ok(())
}

/// Scan a template and store it as a new session.
pub fn ingest(app: &mut App, path: &Path, retention_secs: Option<u64>) -> Result<Session> {
    let template = fs::read(path)?;
    let registry = app.engine.scan(&template)?;

    let session = Session::new(template, registry, unix_now()).with_retention(retention_secs);
    app.store.create(&session)?;

    info!(session = %session.id, placeholders = session.registry.len(), file = %path.display(), "ingested template");
    Ok(session)
}
