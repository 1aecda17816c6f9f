//! Configuration management: CLI flags merged over an optional JSON file.
//!
//! Every option can come from either source; a CLI flag always wins over
//! the config file. Paths accept a leading `~`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::render::LayoutOptions;
use crate::services::QueueFilter;

/// Fallback display width (in characters) when none is configured.
pub const DEFAULT_DISPLAY_WIDTH: usize = 160;

/// Editor command used when none is configured.
pub const DEFAULT_EDITOR: &str = "gedit";

/// Errors raised while assembling the runtime settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option '{0}' (set it via a CLI flag or the config file)")]
    MissingOption(&'static str),

    #[error("input file has no column named '{0}'")]
    MissingColumn(String),

    #[error("could not read config file {}", .0.display())]
    ReadConfig(PathBuf, #[source] std::io::Error),

    #[error("could not parse config file {}", .0.display())]
    ParseConfig(PathBuf, #[source] serde_json::Error),
}

/// Input CSV column names mapped onto their canonical roles.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub target_text: String,
    pub target_id: String,
    pub reference_text: String,
    pub reference_id: String,
}

/// On-disk JSON configuration. Every field is optional; the CLI wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub input: Option<String>,
    pub output: Option<String>,
    pub target_text_column: Option<String>,
    pub target_id_column: Option<String>,
    pub reference_text_column: Option<String>,
    pub reference_id_column: Option<String>,
    /// Comma-delimited list, same form as the CLI flag.
    pub metadata_columns: Option<String>,
    pub editor: Option<String>,
    pub display_width: Option<usize>,
    pub padding: Option<usize>,
    pub delimiter: Option<String>,
    pub line_numbers: Option<bool>,
    pub queue_filter: Option<QueueFilter>,
}

impl ConfigFile {
    /// Read and parse the config file, or return the empty config when no
    /// path was given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadConfig(path.to_path_buf(), e))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseConfig(path.to_path_buf(), e))
    }
}

/// Values captured from the command line, overriding the config file.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub target_text_column: Option<String>,
    pub target_id_column: Option<String>,
    pub reference_text_column: Option<String>,
    pub reference_id_column: Option<String>,
    pub metadata_columns: Option<String>,
    pub editor: Option<String>,
    pub display_width: Option<usize>,
    pub padding: Option<usize>,
    pub delimiter: Option<String>,
    pub line_numbers: Option<bool>,
    pub queue_filter: Option<QueueFilter>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub columns: ColumnMapping,
    /// Extra input columns retained in the pairs and shown in the header.
    pub metadata_columns: Vec<String>,
    pub editor: String,
    /// Explicit width; the viewport falls back to [`DEFAULT_DISPLAY_WIDTH`].
    pub display_width: Option<usize>,
    pub queue_filter: QueueFilter,
    pub layout: LayoutOptions,
}

/// Load the JSON config file (if any) and merge CLI overrides on top.
///
/// Input, output, and the four column names are required once both sources
/// are merged; everything else has a default.
pub fn load_settings(options: LoadOptions) -> Result<Settings, ConfigError> {
    let file = ConfigFile::load(options.config_path.as_deref())?;

    let input = options
        .input
        .or(file.input)
        .ok_or(ConfigError::MissingOption("input"))?;
    let output = options
        .output
        .or(file.output)
        .ok_or(ConfigError::MissingOption("output"))?;

    let columns = ColumnMapping {
        target_text: options
            .target_text_column
            .or(file.target_text_column)
            .ok_or(ConfigError::MissingOption("target-text-column"))?,
        target_id: options
            .target_id_column
            .or(file.target_id_column)
            .ok_or(ConfigError::MissingOption("target-id-column"))?,
        reference_text: options
            .reference_text_column
            .or(file.reference_text_column)
            .ok_or(ConfigError::MissingOption("reference-text-column"))?,
        reference_id: options
            .reference_id_column
            .or(file.reference_id_column)
            .ok_or(ConfigError::MissingOption("reference-id-column"))?,
    };

    let defaults = LayoutOptions::default();
    let layout = LayoutOptions {
        line_numbers: options.line_numbers.or(file.line_numbers).unwrap_or(false),
        padding: options.padding.or(file.padding).unwrap_or(defaults.padding),
        delimiter: options
            .delimiter
            .or(file.delimiter)
            .unwrap_or(defaults.delimiter),
    };

    Ok(Settings {
        input_path: expand_path(&input),
        output_path: expand_path(&output),
        columns,
        metadata_columns: parse_column_list(
            options
                .metadata_columns
                .or(file.metadata_columns)
                .as_deref(),
        ),
        editor: options
            .editor
            .or(file.editor)
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
        display_width: options.display_width.or(file.display_width),
        queue_filter: options
            .queue_filter
            .or(file.queue_filter)
            .unwrap_or_default(),
        layout,
    })
}

/// Split a comma-delimited column list, trimming whitespace around names.
fn parse_column_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Expand a leading `~` the way the shell would.
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
