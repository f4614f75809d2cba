//! Preview command implementation.

use crate::app::App;
use crate::cli::SessionArgs;
use crate::config::OutputFormat;
use crate::error::Result;

/// Execute the preview command.
pub fn execute_preview(args: SessionArgs, app: &App) -> Result<()> {
    let session = app.load_session(&args.session)?;
    let text = app.engine.preview(&session.original, &session.registry)?;

    match app.formatter.format() {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "preview": text }))?
        ),
        OutputFormat::Table | OutputFormat::Quiet => println!("{}", text),
    }
    Ok(())
}
