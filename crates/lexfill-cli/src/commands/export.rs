//! Export command implementation.

use crate::app::App;
use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use lexfill_domain::Session;
use lexfill_engine::ExportSummary;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, app: &mut App) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        )));
    }

    let mut session = app.load_session(&args.session)?;
    let summary = export(app, &mut session, &args.output)?;

    println!(
        "{}",
        app.formatter.format_export(&args.output.display().to_string(), &summary)?
    );
    Ok(())
}

/// Replace from the session's template, write `output`, and keep the bytes.
///
/// The session only records the export once the file is in place.
pub fn export(app: &mut App, session: &mut Session, output: &Path) -> Result<ExportSummary> {
    let (filled, summary) = app.engine.export_with_summary(&session.original, &session.registry)?;

    let tmp = output.with_extension("docx.tmp");
    fs::write(&tmp, &filled)?;
    fs::rename(&tmp, output)?;

    session.filled = Some(filled);
    app.save_session(session)?;

    info!(session = %session.id, output = %output.display(), occurrences = summary.occurrences, "exported document");
    Ok(summary)
}
