//! Spreadsheet discovery and loading.
//!
//! Finds the exported usage spreadsheet on disk and reads its first sheet
//! into a [`RawTable`] of loosely typed [`Cell`]s. Typing and validation
//! happen later in [`crate::loader`].

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use report_core::dates::DateParser;
use report_core::error::{ReportError, Result};
use tracing::{debug, warn};

/// File-name prefix of the per-store daily usage export.
pub const EXPORT_FILE_PREFIX: &str = "各校区每日图形化编程作品使用时长";

/// Workbook extensions handled by the spreadsheet reader.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

// ── Cell / RawTable ───────────────────────────────────────────────────────────

/// One spreadsheet cell, before any column-specific typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date-formatted numeric cell, as a serial day number.
    DateSerial(f64),
}

impl Cell {
    /// Text form of the cell. Integral numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) | Cell::DateSerial(n) => format_plain_number(*n),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Numeric value; text is parsed after trimming. Non-finite → `None`.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Calendar date; unparseable values give `None`, never an error.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateSerial(n) | Cell::Number(n) => DateParser::from_serial(*n),
            Cell::Text(s) => DateParser::parse_str(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Header row plus data rows of one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Index of the column whose header equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`), or [`Cell::Empty`] for short rows.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Directory searched when neither `--file` nor `--data-dir` is given.
pub fn default_data_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `true` when `path` has an extension the reader understands.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            e == "csv" || WORKBOOK_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Find every export file under `data_dir`, sorted by path.
pub fn find_export_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .max_depth(2)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && is_supported(entry.path())
                && entry
                    .file_name()
                    .to_str()
                    .map(|n| n.starts_with(EXPORT_FILE_PREFIX) && !n.starts_with("~$"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Most recently modified export under `data_dir`. Ties go to the greater
/// path, which for timestamped export names is the later export.
pub fn latest_export(data_dir: &Path) -> Option<PathBuf> {
    find_export_files(data_dir)
        .into_iter()
        .map(|p| {
            let modified = std::fs::metadata(&p)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, p)
        })
        .max()
        .map(|(_, p)| p)
}

/// Decide which file to load.
///
/// An explicit `file` must exist. Otherwise the newest export in `data_dir`
/// (or [`default_data_dir`]) is used. Both misses are
/// [`ReportError::SourceNotFound`].
pub fn resolve_source(file: Option<&Path>, data_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(file) = file {
        return if file.is_file() {
            Ok(file.to_path_buf())
        } else {
            Err(ReportError::SourceNotFound(file.to_path_buf()))
        };
    }

    let dir = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_data_dir);
    match latest_export(&dir) {
        Some(path) => {
            debug!("Discovered export {}", path.display());
            Ok(path)
        }
        None => Err(ReportError::SourceNotFound(
            dir.join(format!("{EXPORT_FILE_PREFIX}*.xlsx")),
        )),
    }
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Read the first sheet of `path` (or the whole CSV) into a [`RawTable`].
pub fn read_table(path: &Path) -> Result<RawTable> {
    if !path.is_file() {
        return Err(ReportError::SourceNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = if ext == "csv" {
        read_csv(path)?
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_workbook(path)?
    } else {
        return Err(ReportError::LoadFailure(format!(
            "unsupported file type: {}",
            path.display()
        )));
    };

    debug!(
        "Read {} rows and {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet tools prepend a BOM to UTF-8 CSV exports.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect();
        if !row.iter().all(Cell::is_empty) {
            rows.push(row);
        }
    }

    Ok(RawTable { headers, rows })
}

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReportError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::LoadFailure(format!("{} has no worksheets", path.display())))?
        .map_err(|e| ReportError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row.iter().map(|c| convert_cell(c).as_text()).collect(),
        None => {
            return Err(ReportError::LoadFailure(format!(
                "{} has an empty first sheet",
                path.display()
            )))
        }
    };

    let rows: Vec<Vec<Cell>> = sheet_rows
        .map(|r| r.iter().map(convert_cell).collect::<Vec<Cell>>())
        .filter(|r| !r.iter().all(Cell::is_empty))
        .collect();

    Ok(RawTable { headers, rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateSerial(dt.as_f64()),
    }
}

fn format_plain_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
