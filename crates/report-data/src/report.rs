//! Chart-ready reports built from a [`UsageDataset`] and a [`Selection`].

use chrono::NaiveDate;
use report_core::formatting::display_project_name;
use report_core::models::{CategoryFilter, ProjectAggregate, ProjectCategory};
use serde::Serialize;
use tracing::debug;

use crate::analysis::UsageDataset;

/// Headroom applied above the largest bar.
pub const AXIS_HEADROOM: f64 = 1.2;

// ── Selection ─────────────────────────────────────────────────────────────────

/// What the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Canonical project name, or `None` for no selection.
    pub project: Option<String>,
    pub filter: CategoryFilter,
}

impl Selection {
    pub fn new(project: Option<String>, filter: CategoryFilter) -> Self {
        Self { project, filter }
    }
}

// ── Series ────────────────────────────────────────────────────────────────────

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// An ordered set of bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Upper bound of the value axis.
    pub fn axis_max(&self) -> f64 {
        axis_max(self.points.iter().map(|p| p.value))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<SeriesPoint> for Series {
    fn from_iter<I: IntoIterator<Item = SeriesPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// `max × AXIS_HEADROOM`, or `1.0` when there is nothing positive to show.
pub fn axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0, f64::max);
    if max > 0.0 {
        max * AXIS_HEADROOM
    } else {
        1.0
    }
}

fn to_points(projects: &[ProjectAggregate]) -> Vec<SeriesPoint> {
    projects
        .iter()
        .map(|p| SeriesPoint::new(display_project_name(&p.name), p.total_minutes))
        .collect()
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Charts for the selected project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub category: ProjectCategory,
    /// Single bar: project → total minutes.
    pub total: Series,
    /// Store → total minutes, largest first.
    pub stores: Series,
    pub first_usage: NaiveDate,
    pub record_count: u32,
    pub store_count: u32,
}

impl ProjectReport {
    pub fn total_minutes(&self) -> f64 {
        self.total.points.first().map(|p| p.value).unwrap_or(0.0)
    }
}

/// Median split over the projects admitted by the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortReport {
    pub filter: CategoryFilter,
    /// `None` when no project matches the filter.
    pub median: Option<f64>,
    pub above: Vec<SeriesPoint>,
    pub at_or_below: Vec<SeriesPoint>,
}

impl CohortReport {
    pub fn is_empty(&self) -> bool {
        self.median.is_none()
    }

    /// Shared value-axis bound for both cohort charts.
    pub fn axis_max(&self) -> f64 {
        axis_max(self.above.iter().chain(&self.at_or_below).map(|p| p.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// `None` when nothing (or an unknown name) is selected.
    pub project: Option<ProjectReport>,
    pub cohort: CohortReport,
}

// ── ReportBuilder ─────────────────────────────────────────────────────────────

/// Stateless builder; every call recomputes from the dataset.
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn build(dataset: &UsageDataset, selection: &Selection) -> Report {
        let project = selection
            .project
            .as_deref()
            .and_then(|name| Self::project_report(dataset, name));

        let split = dataset.cohort(selection.filter);
        let cohort = CohortReport {
            filter: selection.filter,
            median: split.median,
            above: to_points(&split.above),
            at_or_below: to_points(&split.at_or_below),
        };

        debug!(
            "Built report: project={:?} filter={} median={:?}",
            selection.project, selection.filter, cohort.median
        );

        Report { project, cohort }
    }

    fn project_report(dataset: &UsageDataset, name: &str) -> Option<ProjectReport> {
        let project = dataset.project(name)?;
        let aggregate = &project.aggregate;

        let stores = dataset
            .store_breakdown(name)
            .into_iter()
            .map(|s| SeriesPoint::new(s.store, s.total_minutes))
            .collect();

        Some(ProjectReport {
            name: aggregate.name.clone(),
            category: project.category,
            total: Series {
                points: vec![SeriesPoint::new(
                    display_project_name(&aggregate.name),
                    aggregate.total_minutes,
                )],
            },
            stores,
            first_usage: aggregate.first_usage,
            record_count: aggregate.record_count,
            store_count: aggregate.store_count,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::formatting::UNNAMED_PROJECT;
    use report_core::models::UsageRecord;
    use report_core::normalize::NameNormalizer;

    fn record(day: u32, raw: &str, store: &str, minutes: f64) -> UsageRecord {
        let normalizer = NameNormalizer::Basic;
        UsageRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            raw_project_name: raw.to_string(),
            project_name: normalizer.normalize(raw),
            store: store.to_string(),
            duration_minutes: minutes,
        }
    }

    fn dataset() -> UsageDataset {
        UsageDataset::from_records(
            vec![
                record(2, "A_射箭比赛", "S1", 30.0),
                record(1, "A_射箭比赛", "S2", 10.0),
                record(3, "B_机械臂", "S1", 60.0),
                record(4, "C_智能小车", "S3", 20.0),
                record(5, "D_接苹果", "S2", 5.0),
            ],
            NameNormalizer::Basic,
        )
    }

    fn labels(points: &[SeriesPoint]) -> Vec<&str> {
        points.iter().map(|p| p.label.as_str()).collect()
    }

    // ── project ──────────────────────────────────────────────────────────────

    #[test]
    fn test_selected_project_totals_and_stores() {
        let report = ReportBuilder::build(
            &dataset(),
            &Selection::new(Some("射箭比赛".into()), CategoryFilter::All),
        );
        let project = report.project.unwrap();
        assert_eq!(project.total.points, vec![SeriesPoint::new("射箭比赛", 40.0)]);
        assert_eq!(
            project.stores.points,
            vec![SeriesPoint::new("S1", 30.0), SeriesPoint::new("S2", 10.0)]
        );
        assert_eq!(project.first_usage, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(project.category, ProjectCategory::Software);
        assert_eq!(project.total_minutes(), 40.0);
        assert_eq!(project.record_count, 2);
        assert_eq!(project.store_count, 2);
    }

    #[test]
    fn test_no_selection_has_no_project() {
        let report = ReportBuilder::build(&dataset(), &Selection::default());
        assert!(report.project.is_none());
        assert!(!report.cohort.is_empty());
    }

    #[test]
    fn test_unknown_project_is_empty_selection() {
        let report = ReportBuilder::build(
            &dataset(),
            &Selection::new(Some("不存在".into()), CategoryFilter::All),
        );
        assert!(report.project.is_none());
    }

    #[test]
    fn test_unnamed_project_is_labelled() {
        let ds = UsageDataset::from_records(
            vec![record(1, "套餐_", "S1", 3.0)],
            NameNormalizer::Basic,
        );
        let report = ReportBuilder::build(&ds, &Selection::new(Some(String::new()), CategoryFilter::All));
        let project = report.project.unwrap();
        assert_eq!(project.name, "");
        assert_eq!(project.total.points[0].label, UNNAMED_PROJECT);
        assert_eq!(labels(&report.cohort.at_or_below), vec![UNNAMED_PROJECT]);
    }

    // ── cohort ───────────────────────────────────────────────────────────────

    #[test]
    fn test_cohort_all() {
        let report = ReportBuilder::build(&dataset(), &Selection::default());
        let cohort = report.cohort;
        assert_eq!(cohort.filter, CategoryFilter::All);
        assert_eq!(cohort.median, Some(30.0));
        assert_eq!(labels(&cohort.above), vec!["机械臂", "射箭比赛"]);
        assert_eq!(labels(&cohort.at_or_below), vec!["智能小车", "接苹果"]);
    }

    #[test]
    fn test_filter_rescopes_median() {
        let ds = dataset();
        let all = ReportBuilder::build(&ds, &Selection::default());
        let hw = ReportBuilder::build(&ds, &Selection::new(None, CategoryFilter::Hardware));
        let sw = ReportBuilder::build(&ds, &Selection::new(None, CategoryFilter::Software));

        assert_eq!(hw.cohort.median, Some(40.0));
        assert_ne!(all.cohort.median, hw.cohort.median);
        assert_eq!(labels(&hw.cohort.above), vec!["机械臂"]);
        assert_eq!(labels(&hw.cohort.at_or_below), vec!["智能小车"]);

        assert_eq!(sw.cohort.median, Some(22.5));
        assert_eq!(labels(&sw.cohort.above), vec!["射箭比赛"]);
    }

    #[test]
    fn test_empty_cohort() {
        let ds = UsageDataset::from_records(
            vec![record(1, "A_射箭比赛", "S1", 10.0)],
            NameNormalizer::Basic,
        );
        let report = ReportBuilder::build(&ds, &Selection::new(None, CategoryFilter::Hardware));
        assert!(report.cohort.is_empty());
        assert_eq!(report.cohort.median, None);
        assert!(report.cohort.above.is_empty());
        assert!(report.cohort.at_or_below.is_empty());
    }

    #[test]
    fn test_project_selection_independent_of_filter() {
        let report = ReportBuilder::build(
            &dataset(),
            &Selection::new(Some("射箭比赛".into()), CategoryFilter::Hardware),
        );
        assert!(report.project.is_some());
        assert!(!labels(&report.cohort.above).contains(&"射箭比赛"));
    }

    // ── axis ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_axis_max_has_headroom() {
        let series: Series = vec![SeriesPoint::new("a", 50.0), SeriesPoint::new("b", 10.0)]
            .into_iter()
            .collect();
        assert!((series.axis_max() - 60.0).abs() < 1e-9);
        assert_eq!(series.max_value(), 50.0);
        assert_eq!(Series::default().axis_max(), 1.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = ReportBuilder::build(
            &dataset(),
            &Selection::new(Some("射箭比赛".into()), CategoryFilter::All),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["project"]["total"]["points"][0]["value"], 40.0);
        assert_eq!(json["project"]["category"], "software");
        assert_eq!(json["cohort"]["filter"], "all");
        assert_eq!(json["cohort"]["median"], 30.0);
    }
}
