use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the works usage report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input spreadsheet does not exist at the expected location.
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// The input exists but could not be turned into usage rows.
    #[error("Failed to load usage data: {0}")]
    LoadFailure(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A workbook could not be opened or a sheet could not be read.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// A JSON document could not be parsed or written.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// `true` for every variant that means "the usage data could not be
    /// loaded", i.e. the report must be aborted without partial output.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ReportError::SourceNotFound(_)
                | ReportError::LoadFailure(_)
                | ReportError::FileRead { .. }
                | ReportError::Csv(_)
                | ReportError::Spreadsheet(_)
        )
    }
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
