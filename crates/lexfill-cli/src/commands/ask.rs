//! Ask command implementation.

use crate::app::App;
use crate::cli::AskArgs;
use crate::error::Result;
use lexfill_domain::NextQuestion;

/// Execute the ask command.
pub fn execute_ask(args: AskArgs, app: &App) -> Result<()> {
    let session = app.load_session(&args.session)?;

    let next = match &args.key {
        Some(key) => {
            let question = app.engine.question_for_key(&session.registry, key)?;
            NextQuestion {
                next: Some(question),
                ..app.engine.next_question(&session.registry)
            }
        }
        None => app.next_question(&session.registry),
    };

    println!("{}", app.formatter.format_question(&next)?);
    Ok(())
}
