use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::models::{
    CategoryFilter, ColumnNames, DEFAULT_DATE_COLUMN, DEFAULT_DURATION_COLUMN,
    DEFAULT_NAME_COLUMN, DEFAULT_STORE_COLUMN,
};
use crate::normalize::NameNormalizer;

/// Accepted `--theme` values.
pub const THEME_NAMES: &[&str] = &["light", "dark", "classic", "auto"];

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".works-report";

/// Root of the per-user state directory (`~/.works-report`).
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

// ── OutputMode ─────────────────────────────────────────────────────────────────

/// Where the report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive terminal UI.
    Tui,
    /// Plain text on stdout.
    Text,
    /// Pretty JSON on stdout.
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "tui" => Ok(OutputMode::Tui),
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            other => Err(ReportError::Config(format!("unknown output mode: {other}"))),
        }
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Usage report for graphical-programming works across stores
#[derive(Parser, Debug, Clone)]
#[command(
    name = "works-report",
    about = "Usage report for graphical-programming works across stores",
    version
)]
pub struct Settings {
    /// Spreadsheet to load (.xlsx, .xls, .xlsm, .ods or .csv)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Directory searched for the newest export when --file is not given
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output mode
    #[arg(long, default_value = "tui", value_parser = ["tui", "text", "json"])]
    pub output: String,

    /// Project selected at startup (canonical name)
    #[arg(long)]
    pub project: Option<String>,

    /// Category filter for the median split
    #[arg(long, default_value = "all", value_parser = ["all", "hardware", "software"])]
    pub category: String,

    /// Project-name normalization strategy
    #[arg(long, default_value = "advanced", value_parser = ["basic", "advanced"])]
    pub normalizer: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Header of the date column
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Header of the work-name column
    #[arg(long, default_value = DEFAULT_NAME_COLUMN)]
    pub name_column: String,

    /// Header of the duration (minutes) column
    #[arg(long, default_value = DEFAULT_DURATION_COLUMN)]
    pub duration_column: String,

    /// Header of the store column
    #[arg(long, default_value = DEFAULT_STORE_COLUMN)]
    pub store_column: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.works-report/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LastUsedParams {
    /// Default path of the persisted config file.
    pub fn config_path() -> PathBuf {
        app_dir().join("last_used.json")
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params; `Default` when the file is absent or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Self::load_with_last_used`] with explicit args and config
    /// path, so tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. `project` is never restored: the dataset may have
        // changed since the last run.
        // Persisted values that no longer parse are ignored.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme.filter(|v| THEME_NAMES.contains(&v.as_str())) {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "category") {
            if let Some(v) = last.category.filter(|v| v.parse::<CategoryFilter>().is_ok()) {
                settings.category = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "normalizer") {
            if let Some(v) = last.normalizer.filter(|v| v.parse::<NameNormalizer>().is_ok()) {
                settings.normalizer = v;
            }
        }
        // An explicit --data-dir asks for discovery, so the remembered file
        // is only restored when neither location was given and it still exists.
        let data_dir_given = is_arg_explicitly_set(&matches, "data_dir");
        if settings.file.is_none() && !data_dir_given {
            settings.file = last.file.filter(|p| p.is_file());
        }
        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }

        settings = Self::apply_overrides(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("Could not persist settings: {}", e);
        }

        settings
    }

    /// `--debug` forces the `DEBUG` log level.
    fn apply_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn output_mode(&self) -> Result<OutputMode> {
        OutputMode::parse(&self.output)
    }

    pub fn category_filter(&self) -> Result<CategoryFilter> {
        self.category.parse()
    }

    pub fn name_normalizer(&self) -> Result<NameNormalizer> {
        self.normalizer.parse()
    }

    pub fn column_names(&self) -> ColumnNames {
        ColumnNames {
            date: self.date_column.clone(),
            name: self.name_column.clone(),
            duration: self.duration_column.clone(),
            store: self.store_column.clone(),
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            category: Some(s.category.clone()),
            normalizer: Some(s.normalizer.clone()),
            data_dir: s.data_dir.clone(),
            file: s.file.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
