//! Usage aggregation by canonical project name and by store.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use report_core::models::{rank_order, ProjectAggregate, StoreAggregate, UsageRecord};

// ── Accumulators ──────────────────────────────────────────────────────────────

/// Durations are collected and summed in sorted order, so totals are
/// bit-identical however the input rows are ordered.
#[derive(Debug, Default)]
struct MinuteSum {
    values: Vec<f64>,
}

impl MinuteSum {
    fn push(&mut self, minutes: f64) {
        self.values.push(minutes);
    }

    fn count(&self) -> u32 {
        self.values.len() as u32
    }

    fn total(mut self) -> f64 {
        self.values.sort_by(f64::total_cmp);
        self.values.iter().sum()
    }
}

#[derive(Debug)]
struct ProjectAccumulator<'a> {
    minutes: MinuteSum,
    first_usage: NaiveDate,
    stores: BTreeSet<&'a str>,
}

impl<'a> ProjectAccumulator<'a> {
    fn new(record: &'a UsageRecord) -> Self {
        Self {
            minutes: MinuteSum::default(),
            first_usage: record.date,
            stores: BTreeSet::new(),
        }
    }

    fn add(&mut self, record: &'a UsageRecord) {
        self.minutes.push(record.duration_minutes);
        self.first_usage = self.first_usage.min(record.date);
        self.stores.insert(record.store.as_str());
    }
}

// ── UsageAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups usage records.
pub struct UsageAggregator;

impl UsageAggregator {
    /// One aggregate per distinct canonical name, largest total first.
    pub fn aggregate_by_project(records: &[UsageRecord]) -> Vec<ProjectAggregate> {
        let mut groups: BTreeMap<&str, ProjectAccumulator<'_>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.project_name.as_str())
                .or_insert_with(|| ProjectAccumulator::new(record))
                .add(record);
        }

        let mut result: Vec<ProjectAggregate> = groups
            .into_iter()
            .map(|(name, acc)| ProjectAggregate {
                name: name.to_string(),
                record_count: acc.minutes.count(),
                store_count: acc.stores.len() as u32,
                first_usage: acc.first_usage,
                total_minutes: acc.minutes.total(),
            })
            .collect();

        result.sort_by(|a, b| rank_order(a.total_minutes, &a.name, b.total_minutes, &b.name));
        result
    }

    /// Per-store totals for the records of `project`, largest first.
    ///
    /// Unknown projects produce an empty vector.
    pub fn aggregate_by_store(records: &[UsageRecord], project: &str) -> Vec<StoreAggregate> {
        let mut groups: BTreeMap<&str, MinuteSum> = BTreeMap::new();
        for record in records.iter().filter(|r| r.project_name == project) {
            groups
                .entry(record.store.as_str())
                .or_default()
                .push(record.duration_minutes);
        }

        let mut result: Vec<StoreAggregate> = groups
            .into_iter()
            .map(|(store, minutes)| StoreAggregate {
                store: store.to_string(),
                record_count: minutes.count(),
                total_minutes: minutes.total(),
            })
            .collect();

        result.sort_by(|a, b| rank_order(a.total_minutes, &a.store, b.total_minutes, &b.store));
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, name: &str, store: &str, minutes: f64) -> UsageRecord {
        UsageRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            raw_project_name: name.to_string(),
            project_name: name.to_string(),
            store: store.to_string(),
            duration_minutes: minutes,
        }
    }

    fn sample() -> Vec<UsageRecord> {
        vec![
            record(3, "射箭比赛", "S1", 30.0),
            record(1, "射箭比赛", "S2", 10.0),
            record(2, "智能小车", "S1", 15.5),
            record(5, "机械臂", "S3", 50.0),
            record(4, "射箭比赛", "S1", 0.1),
            record(6, "智能小车", "S1", 0.2),
            record(7, "智能小车", "S2", 0.3),
        ]
    }

    // ── aggregate_by_project ─────────────────────────────────────────────────

    #[test]
    fn test_aggregate_by_project_totals_and_order() {
        let projects = UsageAggregator::aggregate_by_project(&sample());
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["机械臂", "射箭比赛", "智能小车"]);

        let archery = &projects[1];
        assert!((archery.total_minutes - 40.1).abs() < 1e-9);
        assert_eq!(archery.record_count, 3);
        assert_eq!(archery.store_count, 2);
        assert_eq!(archery.first_usage, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_aggregate_by_project_ties_break_by_name() {
        let records = vec![
            record(1, "乙", "S1", 10.0),
            record(1, "甲", "S1", 10.0),
            record(1, "B", "S1", 10.0),
        ];
        let names: Vec<String> = UsageAggregator::aggregate_by_project(&records)
            .into_iter()
            .map(|p| p.name)
            .collect();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_aggregate_is_invariant_under_row_order() {
        let forward = sample();
        let mut reversed = sample();
        reversed.reverse();
        let mut rotated = sample();
        rotated.rotate_left(3);

        let expected = UsageAggregator::aggregate_by_project(&forward);
        assert_eq!(UsageAggregator::aggregate_by_project(&reversed), expected);
        assert_eq!(UsageAggregator::aggregate_by_project(&rotated), expected);

        let stores = UsageAggregator::aggregate_by_store(&forward, "智能小车");
        assert_eq!(UsageAggregator::aggregate_by_store(&reversed, "智能小车"), stores);
        assert_eq!(UsageAggregator::aggregate_by_store(&rotated, "智能小车"), stores);
    }

    #[test]
    fn test_empty_name_is_its_own_group() {
        let records = vec![record(1, "", "S1", 5.0), record(2, "", "S2", 6.0)];
        let projects = UsageAggregator::aggregate_by_project(&records);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "");
        assert_eq!(projects[0].total_minutes, 11.0);
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(UsageAggregator::aggregate_by_project(&[]).is_empty());
        assert!(UsageAggregator::aggregate_by_store(&[], "射箭比赛").is_empty());
    }

    // ── aggregate_by_store ───────────────────────────────────────────────────

    #[test]
    fn test_aggregate_by_store_scoped_to_project() {
        let stores = UsageAggregator::aggregate_by_store(&sample(), "射箭比赛");
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].store, "S1");
        assert!((stores[0].total_minutes - 30.1).abs() < 1e-9);
        assert_eq!(stores[0].record_count, 2);
        assert_eq!(stores[1].store, "S2");
        assert_eq!(stores[1].total_minutes, 10.0);
    }

    #[test]
    fn test_aggregate_by_store_unknown_project() {
        assert!(UsageAggregator::aggregate_by_store(&sample(), "不存在").is_empty());
    }
}
