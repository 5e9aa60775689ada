//! Non-interactive report output (`--output text` and `--output json`).

use report_core::formatting::{display_project_name, format_date, format_minutes};
use report_data::analysis::{ClassifiedProject, DatasetMetadata, UsageDataset};
use report_data::report::{Report, SeriesPoint};
use report_ui::components::bar::pad_to_width;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const INDENT: &str = "  ";

#[derive(Serialize)]
struct JsonOutput<'a> {
    metadata: &'a DatasetMetadata,
    projects: &'a [ClassifiedProject],
    report: &'a Report,
}

/// Metadata, the ranked project list and the report as pretty JSON.
pub fn render_json(dataset: &UsageDataset, report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        metadata: dataset.metadata(),
        projects: dataset.projects(),
        report,
    })
}

fn point_lines(points: &[SeriesPoint], indent: &str) -> Vec<String> {
    let width = points.iter().map(|p| p.label.width()).max().unwrap_or(0);
    points
        .iter()
        .map(|p| {
            format!(
                "{indent}{}  {}",
                pad_to_width(&p.label, width),
                format_minutes(p.value)
            )
        })
        .collect()
}

/// Plain-text rendering of the same content the TUI shows.
pub fn render_text(dataset: &UsageDataset, report: &Report) -> String {
    let meta = dataset.metadata();
    let summary = dataset.summary();
    let mut lines = vec!["作品使用分析".to_string()];

    if let Some(source) = &meta.source {
        lines.push(format!("Source: {}", source.display()));
    }
    lines.push(format!(
        "Rows: {} read, {} kept, {} dropped ({} without duration, {} without date)",
        summary.rows_read,
        summary.kept,
        summary.dropped(),
        summary.dropped_missing_duration,
        summary.dropped_missing_date
    ));

    // ── Ranked projects ──
    lines.push(String::new());
    lines.push(format!("Projects ({}):", dataset.projects().len()));
    let name_width = dataset
        .projects()
        .iter()
        .map(|p| display_project_name(&p.aggregate.name).width())
        .max()
        .unwrap_or(0);
    for (i, p) in dataset.projects().iter().enumerate() {
        lines.push(format!(
            "{INDENT}{:>3}. {}  [{}]  {}",
            i + 1,
            pad_to_width(display_project_name(&p.aggregate.name), name_width),
            p.category.label(),
            format_minutes(p.aggregate.total_minutes)
        ));
    }

    // ── Selected project ──
    lines.push(String::new());
    match &report.project {
        Some(project) => {
            lines.push(format!(
                "Project: {} [{}]",
                display_project_name(&project.name),
                project.category.label()
            ));
            lines.push(format!(
                "{INDENT}Total: {}  First usage: {}  Records: {}  Stores: {}",
                format_minutes(project.total_minutes()),
                format_date(project.first_usage),
                project.record_count,
                project.store_count
            ));
            lines.push(format!("{INDENT}By store:"));
            lines.extend(point_lines(&project.stores.points, "    "));
        }
        None => lines.push("Project: (none selected)".to_string()),
    }

    // ── Median split ──
    lines.push(String::new());
    let cohort = &report.cohort;
    match cohort.median {
        Some(median) => {
            lines.push(format!(
                "Median split ({}): median {}",
                cohort.filter.label(),
                format_minutes(median)
            ));
            lines.push(format!("{INDENT}Above median ({}):", cohort.above.len()));
            lines.extend(point_lines(&cohort.above, "    "));
            lines.push(format!(
                "{INDENT}At or below median ({}):",
                cohort.at_or_below.len()
            ));
            lines.extend(point_lines(&cohort.at_or_below, "    "));
        }
        None => lines.push(format!(
            "Median split ({}): no projects in this category",
            cohort.filter.label()
        )),
    }

    lines.push(String::new());
    lines.join("\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
