//! CLI argument parsing and dispatch.

mod annotate;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::config::{load_settings, LoadOptions};
use crate::services::QueueFilter;

#[derive(Parser)]
#[command(name = "docmatch")]
#[command(about = "Manual document-pair match annotation tool")]
#[command(version)]
pub struct Cli {
    /// Input CSV file with the candidate pairs to annotate
    #[arg(short, long)]
    input: Option<String>,

    /// Output CSV file receiving the judgments
    #[arg(short, long)]
    output: Option<String>,

    /// Column holding the target document text
    #[arg(long)]
    target_text_column: Option<String>,

    /// Column holding the target document id
    #[arg(long)]
    target_id_column: Option<String>,

    /// Column holding the reference document text
    #[arg(long)]
    reference_text_column: Option<String>,

    /// Column holding the reference document id
    #[arg(long)]
    reference_id_column: Option<String>,

    /// Comma-delimited list of extra input columns to keep and display,
    /// e.g. 'date,nchar,language'
    #[arg(short, long)]
    metadata_columns: Option<String>,

    /// JSON config file; CLI flags take precedence over it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Editor command used to display each pair
    #[arg(long)]
    editor: Option<String>,

    /// Display width in characters (a fixed default applies when unset)
    #[arg(long)]
    width: Option<usize>,

    /// Gutter width between the two text columns
    #[arg(long)]
    padding: Option<usize>,

    /// Delimiter drawn inside the gutter
    #[arg(long)]
    delimiter: Option<String>,

    /// Prefix each logical line with its line number
    #[arg(long)]
    line_numbers: bool,

    /// How already-annotated rows are excluded from the work queue
    #[arg(long, value_enum)]
    queue_filter: Option<QueueFilter>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments, resolve settings, and run the annotation session.
pub fn run() -> anyhow::Result<()> {
    // A bare invocation prints usage instead of a missing-option error.
    if std::env::args().len() <= 1 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = Cli::parse();
    let options = LoadOptions {
        config_path: cli.config,
        input: cli.input,
        output: cli.output,
        target_text_column: cli.target_text_column,
        target_id_column: cli.target_id_column,
        reference_text_column: cli.reference_text_column,
        reference_id_column: cli.reference_id_column,
        metadata_columns: cli.metadata_columns,
        editor: cli.editor,
        display_width: cli.width,
        padding: cli.padding,
        delimiter: cli.delimiter,
        line_numbers: cli.line_numbers.then_some(true),
        queue_filter: cli.queue_filter,
    };
    let settings = load_settings(options)?;

    annotate::cmd_annotate(&settings)
}
