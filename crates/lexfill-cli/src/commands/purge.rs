//! Purge command implementation.

use crate::app::App;
use crate::config::OutputFormat;
use crate::error::Result;
use lexfill_domain::traits::SessionStore;
use lexfill_store::unix_now;

/// Execute the purge command.
pub fn execute_purge(app: &mut App) -> Result<()> {
    let purged = app.store.purge_expired(unix_now())?;

    match app.formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::json!({ "purged": purged })),
        OutputFormat::Quiet => println!("{}", purged),
        OutputFormat::Table => println!("{}", app.formatter.success(&format!("Purged {} expired session(s)", purged))),
    }
    Ok(())
}
