//! Fill command implementation.

use crate::app::App;
use crate::cli::FillArgs;
use crate::error::{CliError, Result};

/// Execute the fill command.
///
/// A rejected value prints the accepted formats and leaves the session as
/// it was.
pub fn execute_fill(args: FillArgs, app: &mut App) -> Result<()> {
    let mut session = app.load_session(&args.session)?;

    match app.engine.fill(&mut session.registry, &args.key, &args.value) {
        Ok(outcome) => {
            app.save_session(&session)?;
            println!("{}", app.formatter.format_fill(&outcome)?);
            Ok(())
        }
        Err(e) => match e.failure_record(&args.key) {
            Some(failure) => {
                println!("{}", app.formatter.format_failure(&failure)?);
                Err(CliError::Rejected(failure))
            }
            None => Err(e.into()),
        },
    }
}
