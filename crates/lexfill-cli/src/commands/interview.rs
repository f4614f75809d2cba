//! Interactive interview: ask each missing placeholder in turn.

use crate::app::App;
use crate::cli::InterviewArgs;
use crate::commands::{export::export, ingest::ingest};
use crate::config::Config;
use crate::error::{CliError, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};

/// What the user typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    /// Stop asking; progress so far is kept
    Quit,
    /// Take the suggested value
    AcceptSuggestion,
    /// Show the help text
    Help,
    /// A value for the current placeholder
    Value(String),
}

/// Execute the interview command.
pub fn execute_interview(args: InterviewArgs, app: &mut App, history_size: usize) -> Result<()> {
    let mut session = if args.new {
        let retention = app.retention_secs();
        let session = ingest(app, Path::new(&args.target), retention)?;
        println!("{}", app.formatter.info(&format!("Started session {}", session.id)));
        session
    } else {
        app.load_session(&args.target)?
    };

    let config = rustyline::Config::builder()
        .max_history_size(history_size)
        .map_err(editor_error)?
        .auto_add_history(true)
        .build();
    let mut editor = DefaultEditor::with_config(config).map_err(editor_error)?;
    let history_path = history_path()?;
    let _ = editor.load_history(&history_path);

    println!("{}", app.formatter.info("Answer each question; ':q' saves and exits, ':help' for more"));

    loop {
        let next = app.next_question(&session.registry);
        let Some(question) = next.next.as_ref() else {
            println!("{}", app.formatter.success("All placeholders are filled."));
            break;
        };
        println!("{}", app.formatter.format_question(&next)?);

        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", app.formatter.error(&format!("Error: {}", err)));
                break;
            }
        };

        let raw = match parse_reply(&line) {
            Reply::Quit => break,
            Reply::Help => {
                print_help();
                continue;
            }
            Reply::AcceptSuggestion => match &question.suggestion {
                Some(suggestion) => suggestion.clone(),
                None => {
                    println!("{}", app.formatter.warning("No suggestion for this question"));
                    continue;
                }
            },
            Reply::Value(value) => value,
        };

        match app.engine.fill(&mut session.registry, &question.key, &raw) {
            Ok(outcome) => {
                app.save_session(&session)?;
                println!("{}", app.formatter.format_fill(&outcome)?);
            }
            Err(e) => match e.failure_record(&question.key) {
                Some(failure) => println!("{}", app.formatter.format_failure(&failure)?),
                None => return Err(e.into()),
            },
        }
        println!();
    }

    editor.save_history(&history_path).ok();

    if let Some(output) = &args.output {
        if session.registry.is_complete() {
            let summary = export(app, &mut session, output)?;
            println!(
                "{}",
                app.formatter.format_export(&output.display().to_string(), &summary)?
            );
        } else {
            println!(
                "{}",
                app.formatter.warning(&format!(
                    "{} placeholder(s) still missing; not exported",
                    session.registry.remaining_count()
                ))
            );
        }
    }

    println!("{}", app.formatter.info(&format!("Session {}", session.id)));
    Ok(())
}

fn parse_reply(line: &str) -> Reply {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" | ":exit" => Reply::Quit,
        ":help" | ":?" => Reply::Help,
        "" | ":s" | ":suggest" => Reply::AcceptSuggestion,
        _ => Reply::Value(trimmed.to_string()),
    }
}

fn editor_error(err: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", err)))
}

fn history_path() -> Result<PathBuf> {
    let dir = Config::app_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help() {
    println!("  <value>        - Answer the current question");
    println!("  <enter>, :s    - Accept the suggested value");
    println!("  :q, :quit      - Save progress and exit");
    println!("  :help, :?      - Show this help");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply(":q"), Reply::Quit);
        assert_eq!(parse_reply("  :quit "), Reply::Quit);
        assert_eq!(parse_reply(""), Reply::AcceptSuggestion);
        assert_eq!(parse_reply(":help"), Reply::Help);
        assert_eq!(parse_reply("  250k "), Reply::Value("250k".to_string()));
    }
}
