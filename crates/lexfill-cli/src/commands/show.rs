//! Show command implementation.

use crate::app::App;
use crate::cli::SessionArgs;
use crate::error::Result;

/// Execute the show command.
pub fn execute_show(args: SessionArgs, app: &App) -> Result<()> {
    let session = app.load_session(&args.session)?;
    println!("{}", app.formatter.format_registry(&session.registry)?);
    Ok(())
}
