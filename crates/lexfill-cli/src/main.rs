//! Lexfill CLI - fill bracketed placeholders in legal document templates.

use clap::Parser;
use lexfill_cli::commands;
use lexfill_cli::{App, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Log to stderr; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> lexfill_cli::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Flags and LEXFILL_* variables override the file
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }
    if let Some(store) = cli.store {
        config.store.backend = store.into();
    }
    if let Some(enabled) = cli.advisor {
        config.advisor.enabled = enabled;
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let mut app = App::new(&config, formatter)?;

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &mut app)?,
        Command::Show(args) => commands::execute_show(args, &app)?,
        Command::Fill(args) => commands::execute_fill(args, &mut app)?,
        Command::Ask(args) => commands::execute_ask(args, &app)?,
        Command::Preview(args) => commands::execute_preview(args, &app)?,
        Command::Export(args) => commands::execute_export(args, &mut app)?,
        Command::Interview(args) => {
            commands::execute_interview(args, &mut app, config.settings.history_size)?
        }
        Command::Purge => commands::execute_purge(&mut app)?,
    }

    Ok(())
}
