//! Median split of project aggregates.

use report_core::models::{rank_order, CohortSplit, ProjectAggregate};
use report_core::stats::median;

/// Split `projects` around the median of their totals.
///
/// Totals strictly above the median go to `above`, the rest to
/// `at_or_below`; both keep presentation order. Empty input gives
/// `median = None` and two empty lists.
pub fn split_by_median(projects: &[ProjectAggregate]) -> CohortSplit {
    let totals: Vec<f64> = projects.iter().map(|p| p.total_minutes).collect();
    let Some(m) = median(&totals) else {
        return CohortSplit::default();
    };

    let (mut above, mut at_or_below): (Vec<ProjectAggregate>, Vec<ProjectAggregate>) =
        projects.iter().cloned().partition(|p| p.total_minutes > m);

    let order = |a: &ProjectAggregate, b: &ProjectAggregate| {
        rank_order(a.total_minutes, &a.name, b.total_minutes, &b.name)
    };
    above.sort_by(order);
    at_or_below.sort_by(order);

    CohortSplit {
        median: Some(m),
        above,
        at_or_below,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project(name: &str, total: f64) -> ProjectAggregate {
        ProjectAggregate {
            name: name.to_string(),
            total_minutes: total,
            first_usage: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            record_count: 1,
            store_count: 1,
        }
    }

    fn names(list: &[ProjectAggregate]) -> Vec<&str> {
        list.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_split_odd_count() {
        let split = split_by_median(&[project("b", 20.0), project("a", 10.0), project("c", 30.0)]);
        assert_eq!(split.median, Some(20.0));
        assert_eq!(names(&split.above), vec!["c"]);
        assert_eq!(names(&split.at_or_below), vec!["b", "a"]);
    }

    #[test]
    fn test_split_even_count_uses_midpoint() {
        let split = split_by_median(&[
            project("a", 10.0),
            project("b", 20.0),
            project("c", 30.0),
            project("d", 40.0),
        ]);
        assert_eq!(split.median, Some(25.0));
        assert_eq!(names(&split.above), vec!["d", "c"]);
        assert_eq!(names(&split.at_or_below), vec!["b", "a"]);
    }

    #[test]
    fn test_values_equal_to_median_are_at_or_below() {
        let split = split_by_median(&[project("x", 5.0), project("y", 5.0), project("z", 5.0)]);
        assert_eq!(split.median, Some(5.0));
        assert!(split.above.is_empty());
        assert_eq!(names(&split.at_or_below), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_single_project() {
        let split = split_by_median(&[project("solo", 12.0)]);
        assert_eq!(split.median, Some(12.0));
        assert!(split.above.is_empty());
        assert_eq!(split.at_or_below.len(), 1);
    }

    #[test]
    fn test_empty_split() {
        let split = split_by_median(&[]);
        assert_eq!(split.median, None);
        assert!(split.above.is_empty());
        assert!(split.at_or_below.is_empty());
        assert!(split.is_empty());
    }
}
