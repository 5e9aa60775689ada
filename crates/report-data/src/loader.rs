//! Turns a [`RawTable`] into typed [`UsageRecord`]s.

use report_core::error::{ReportError, Result};
use report_core::models::{ColumnNames, UsageRecord};
use report_core::normalize::NameNormalizer;
use serde::Serialize;
use tracing::{info, warn};

use crate::reader::RawTable;

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub kept: usize,
    pub dropped_missing_duration: usize,
    pub dropped_missing_date: usize,
}

impl LoadSummary {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_duration + self.dropped_missing_date
    }
}

/// Records that survived loading, plus the row accounting.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<UsageRecord>,
    pub summary: LoadSummary,
}

struct ColumnIndices {
    date: usize,
    name: usize,
    duration: usize,
    store: usize,
}

fn locate_columns(table: &RawTable, columns: &ColumnNames) -> Result<ColumnIndices> {
    let missing: Vec<&str> = columns
        .required()
        .into_iter()
        .filter(|c| table.column_index(c).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(ReportError::LoadFailure(format!(
            "missing required column(s): {} (found: {})",
            missing.join(", "),
            table.headers.join(", ")
        )));
    }

    // All four were just checked.
    let idx = |c: &str| table.column_index(c).unwrap_or_default();
    Ok(ColumnIndices {
        date: idx(columns.date.as_str()),
        name: idx(columns.name.as_str()),
        duration: idx(columns.duration.as_str()),
        store: idx(columns.store.as_str()),
    })
}

/// Type every row of `table`, dropping rows without a usable duration or
/// date, and canonicalise project names with `normalizer`.
///
/// A row missing both counts once, as a missing duration. Missing names and
/// stores become the empty string. Names and stores are kept verbatim, so
/// values differing only in whitespace stay distinct keys.
pub fn load_records(
    table: &RawTable,
    columns: &ColumnNames,
    normalizer: NameNormalizer,
) -> Result<LoadedRecords> {
    let cols = locate_columns(table, columns)?;

    let mut summary = LoadSummary {
        rows_read: table.rows.len(),
        ..LoadSummary::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());

    for row in 0..table.rows.len() {
        let Some(duration_minutes) = table.cell(row, cols.duration).as_number() else {
            summary.dropped_missing_duration += 1;
            continue;
        };
        let Some(date) = table.cell(row, cols.date).as_date() else {
            summary.dropped_missing_date += 1;
            continue;
        };

        let raw_project_name = table.cell(row, cols.name).as_text();
        let project_name = normalizer.normalize(&raw_project_name);
        let store = table.cell(row, cols.store).as_text();

        records.push(UsageRecord {
            date,
            raw_project_name,
            project_name,
            store,
            duration_minutes,
        });
    }

    summary.kept = records.len();

    if summary.dropped() > 0 {
        warn!(
            "Dropped {} of {} rows ({} without duration, {} without date)",
            summary.dropped(),
            summary.rows_read,
            summary.dropped_missing_duration,
            summary.dropped_missing_date
        );
    }
    info!(
        "Loaded {} usage records using the {} normalizer",
        summary.kept, normalizer
    );

    Ok(LoadedRecords { records, summary })
}
