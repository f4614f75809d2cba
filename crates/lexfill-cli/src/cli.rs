//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexfill - Fill bracketed placeholders in legal document templates.
#[derive(Debug, Parser)]
#[command(name = "lexfill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LEXFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding stored sessions
    #[arg(long, global = true, env = "LEXFILL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Session storage backend
    #[arg(long, value_enum, global = true, env = "LEXFILL_STORE")]
    pub store: Option<StoreArg>,

    /// Ask the configured language model to reword questions
    #[arg(long, global = true, env = "LEXFILL_ADVISOR")]
    pub advisor: Option<bool>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

/// Storage backend options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StoreArg {
    /// SQLite database
    Sqlite,
    /// One directory per session
    File,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a template and start a session
    Ingest(IngestArgs),

    /// List a session's placeholders and values
    Show(SessionArgs),

    /// Supply a value for one placeholder
    Fill(FillArgs),

    /// Show the next question to ask
    Ask(AskArgs),

    /// Render the main body as plain text with values substituted
    Preview(SessionArgs),

    /// Write the filled document
    Export(ExportArgs),

    /// Answer the remaining questions interactively
    Interview(InterviewArgs),

    /// Delete sessions past their retention window
    Purge,
}

/// Arguments naming one session.
#[derive(Debug, Parser)]
pub struct SessionArgs {
    /// Session ID
    pub session: String,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Template (.docx) to scan
    pub file: PathBuf,

    /// Keep the session this many days (overrides the configured retention)
    #[arg(long)]
    pub retention_days: Option<u64>,
}

/// Arguments for the fill command.
#[derive(Debug, Parser)]
pub struct FillArgs {
    /// Session ID
    pub session: String,

    /// Placeholder key (see `show`)
    pub key: String,

    /// Raw value; currency and dates are normalized
    pub value: String,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Session ID
    pub session: String,

    /// Ask about this key instead of the next missing one
    #[arg(short, long)]
    pub key: Option<String>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Session ID
    pub session: String,

    /// Where to write the filled document
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the interview command.
#[derive(Debug, Parser)]
pub struct InterviewArgs {
    /// Session ID, or a template path with --new
    pub target: String,

    /// Treat the target as a template and start a new session
    #[arg(long)]
    pub new: bool,

    /// Export here once every placeholder is filled
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StoreArg> for lexfill_store::Backend {
    fn from(store: StoreArg) -> Self {
        match store {
            StoreArg::Sqlite => lexfill_store::Backend::Sqlite,
            StoreArg::File => lexfill_store::Backend::File,
        }
    }
}
