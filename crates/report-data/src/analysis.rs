//! Load pipeline for the works usage report.
//!
//! Reads the source file once, types and normalizes its rows, aggregates
//! them per project and classifies each project, producing an immutable
//! [`UsageDataset`] that every report is built from.

use std::path::{Path, PathBuf};

use chrono::Utc;
use report_core::classify::classify;
use report_core::error::Result;
use report_core::models::{
    CategoryFilter, ColumnNames, CohortSplit, ProjectAggregate, ProjectCategory, StoreAggregate,
    UsageRecord,
};
use report_core::normalize::NameNormalizer;
use serde::Serialize;
use tracing::info;

use crate::aggregator::UsageAggregator;
use crate::cohort::split_by_median;
use crate::loader::{load_records, LoadSummary, LoadedRecords};
use crate::reader::read_table;

// ── Public types ──────────────────────────────────────────────────────────────

/// A project aggregate together with its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedProject {
    #[serde(flatten)]
    pub aggregate: ProjectAggregate,
    pub category: ProjectCategory,
}

/// Metadata produced alongside the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMetadata {
    /// ISO-8601 timestamp when the dataset was loaded.
    pub generated_at: String,
    /// File the records came from, if any.
    pub source: Option<PathBuf>,
    pub normalizer: NameNormalizer,
    pub summary: LoadSummary,
    /// Wall-clock seconds spent reading and typing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and classifying.
    pub transform_time_seconds: f64,
}

/// Everything derived from one load. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct UsageDataset {
    records: Vec<UsageRecord>,
    projects: Vec<ClassifiedProject>,
    metadata: DatasetMetadata,
}

// ── UsageDataset ──────────────────────────────────────────────────────────────

impl UsageDataset {
    /// Run the full load pipeline on `path`.
    ///
    /// 1. Read the first sheet (or CSV) into a raw table.
    /// 2. Type rows and normalize project names.
    /// 3. Aggregate per project and classify each project.
    pub fn load(path: &Path, columns: &ColumnNames, normalizer: NameNormalizer) -> Result<Self> {
        // ── Step 1–2: Load records ────────────────────────────────────────────
        let load_start = std::time::Instant::now();
        let table = read_table(path)?;
        let loaded = load_records(&table, columns, normalizer)?;
        let load_time = load_start.elapsed().as_secs_f64();

        // ── Step 3: Aggregate ─────────────────────────────────────────────────
        let mut dataset = Self::from_loaded(loaded, normalizer, Some(path.to_path_buf()));
        dataset.metadata.load_time_seconds = load_time;

        info!(
            "Dataset ready: {} projects from {} records in {:.2}s",
            dataset.projects.len(),
            dataset.records.len(),
            load_time + dataset.metadata.transform_time_seconds
        );
        Ok(dataset)
    }

    /// Build a dataset from already-typed records.
    pub fn from_records(records: Vec<UsageRecord>, normalizer: NameNormalizer) -> Self {
        let summary = LoadSummary {
            rows_read: records.len(),
            kept: records.len(),
            ..LoadSummary::default()
        };
        Self::from_loaded(LoadedRecords { records, summary }, normalizer, None)
    }

    fn from_loaded(
        loaded: LoadedRecords,
        normalizer: NameNormalizer,
        source: Option<PathBuf>,
    ) -> Self {
        let transform_start = std::time::Instant::now();
        let projects = UsageAggregator::aggregate_by_project(&loaded.records)
            .into_iter()
            .map(|aggregate| ClassifiedProject {
                category: classify(&aggregate.name),
                aggregate,
            })
            .collect();
        let transform_time = transform_start.elapsed().as_secs_f64();

        Self {
            records: loaded.records,
            projects,
            metadata: DatasetMetadata {
                generated_at: Utc::now().to_rfc3339(),
                source,
                normalizer,
                summary: loaded.summary,
                load_time_seconds: 0.0,
                transform_time_seconds: transform_time,
            },
        }
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    /// All projects in presentation order.
    pub fn projects(&self) -> &[ClassifiedProject] {
        &self.projects
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.metadata.summary
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a project by exact canonical name.
    pub fn project(&self, name: &str) -> Option<&ClassifiedProject> {
        self.projects.iter().find(|p| p.aggregate.name == name)
    }

    /// Aggregates of the projects admitted by `filter`, in presentation order.
    pub fn projects_matching(&self, filter: CategoryFilter) -> Vec<ProjectAggregate> {
        self.projects
            .iter()
            .filter(|p| filter.matches(p.category))
            .map(|p| p.aggregate.clone())
            .collect()
    }

    /// Per-store totals of `project`.
    pub fn store_breakdown(&self, project: &str) -> Vec<StoreAggregate> {
        UsageAggregator::aggregate_by_store(&self.records, project)
    }

    /// Median split over the projects admitted by `filter`.
    pub fn cohort(&self, filter: CategoryFilter) -> CohortSplit {
        split_by_median(&self.projects_matching(filter))
    }

    /// Sum of every kept record's duration.
    pub fn total_minutes(&self) -> f64 {
        self.projects.iter().map(|p| p.aggregate.total_minutes).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
