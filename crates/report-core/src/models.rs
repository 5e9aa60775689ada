use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// Default header of the date column in the exported spreadsheet.
pub const DEFAULT_DATE_COLUMN: &str = "日期";
/// Default header of the free-text work name column.
pub const DEFAULT_NAME_COLUMN: &str = "图形化编程作品名称";
/// Default header of the usage duration column (minutes).
pub const DEFAULT_DURATION_COLUMN: &str = "作品使用时长（分钟）";
/// Default header of the store column.
pub const DEFAULT_STORE_COLUMN: &str = "所属门店";

/// One validated spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Calendar day the usage was recorded for.
    pub date: NaiveDate,
    /// Work name exactly as it appears in the spreadsheet.
    pub raw_project_name: String,
    /// Canonical project name produced by the name normalizer.
    pub project_name: String,
    /// Store (campus) the usage belongs to.
    pub store: String,
    /// Usage duration in minutes.
    pub duration_minutes: f64,
}

/// Usage totals for one canonical project name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAggregate {
    /// Canonical project name (may be empty, see the normalizer docs).
    pub name: String,
    /// Sum of `duration_minutes` over all records of the project.
    pub total_minutes: f64,
    /// Earliest record date of the project.
    pub first_usage: NaiveDate,
    /// Number of records folded into this aggregate.
    pub record_count: u32,
    /// Number of distinct stores that used the project.
    pub store_count: u32,
}

/// Usage totals for one store, scoped to a single project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAggregate {
    pub store: String,
    pub total_minutes: f64,
    pub record_count: u32,
}

/// Category a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    /// Project built around physical kits / sensors.
    Hardware,
    /// Pure on-screen project.
    Software,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Hardware => "hardware",
            ProjectCategory::Software => "software",
        }
    }

    /// Label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::Hardware => "硬件",
            ProjectCategory::Software => "软件",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter applied before the median split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Hardware,
    Software,
}

impl CategoryFilter {
    /// Every filter, in the order the UI cycles through them.
    pub const ALL: [CategoryFilter; 3] = [
        CategoryFilter::All,
        CategoryFilter::Hardware,
        CategoryFilter::Software,
    ];

    /// `true` when a project of `category` passes this filter.
    pub fn matches(&self, category: ProjectCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Hardware => category == ProjectCategory::Hardware,
            CategoryFilter::Software => category == ProjectCategory::Software,
        }
    }

    /// The filter after `self` in [`Self::ALL`], wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Hardware => "hardware",
            CategoryFilter::Software => "software",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "全部",
            CategoryFilter::Hardware => ProjectCategory::Hardware.label(),
            CategoryFilter::Software => ProjectCategory::Software.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "hardware" => Ok(CategoryFilter::Hardware),
            "software" => Ok(CategoryFilter::Software),
            other => Err(ReportError::Config(format!("unknown category: {other}"))),
        }
    }
}

/// Partition of a project set around the median of `total_minutes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CohortSplit {
    /// `None` when the input set was empty.
    pub median: Option<f64>,
    /// Projects strictly above the median.
    pub above: Vec<ProjectAggregate>,
    /// Projects at or below the median.
    pub at_or_below: Vec<ProjectAggregate>,
}

impl CohortSplit {
    pub fn is_empty(&self) -> bool {
        self.above.is_empty() && self.at_or_below.is_empty()
    }
}

/// Spreadsheet headers used to locate the required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub date: String,
    pub name: String,
    pub duration: String,
    pub store: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_COLUMN.to_string(),
            name: DEFAULT_NAME_COLUMN.to_string(),
            duration: DEFAULT_DURATION_COLUMN.to_string(),
            store: DEFAULT_STORE_COLUMN.to_string(),
        }
    }
}

impl ColumnNames {
    /// Headers in `date, name, duration, store` order.
    pub fn required(&self) -> [&str; 4] {
        [
            self.date.as_str(),
            self.name.as_str(),
            self.duration.as_str(),
            self.store.as_str(),
        ]
    }
}

/// Presentation order shared by every ranked list: total descending, then
/// name ascending.
pub fn rank_order(a_total: f64, a_name: &str, b_total: f64, b_name: &str) -> Ordering {
    b_total.total_cmp(&a_total).then_with(|| a_name.cmp(b_name))
}
