//! Median split charts for the active category filter.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use report_core::formatting::format_minutes;
use report_data::report::CohortReport;

use crate::components::bar::bar_lines;
use crate::themes::Theme;

/// Build the cohort panel lines for a content area `width` columns wide.
///
/// Returns an empty vector for an empty cohort; callers render the
/// placeholder instead.
pub fn build_cohort_lines<'a>(
    cohort: &'a CohortReport,
    width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let Some(median) = cohort.median else {
        return Vec::new();
    };
    let axis = cohort.axis_max();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("中位数 ", theme.label),
            Span::styled(format_minutes(median), theme.value),
            Span::styled(format!("   （{}）", cohort.filter.label()), theme.dim),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("高于中位数 ({})", cohort.above.len()),
            theme.header,
        )),
    ];

    if cohort.above.is_empty() {
        lines.push(Line::from(Span::styled("（无）", theme.dim)));
    } else {
        lines.extend(bar_lines(&cohort.above, axis, width, theme.bar_above, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("不高于中位数 ({})", cohort.at_or_below.len()),
        theme.header,
    )));
    lines.extend(bar_lines(
        &cohort.at_or_below,
        axis,
        width,
        theme.bar_at_or_below,
        theme,
    ));

    lines
}

/// Render the cohort charts, or the empty-category placeholder.
pub fn render_cohort_view(frame: &mut Frame, area: Rect, cohort: &CohortReport, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" 中位数分组 · {} ", cohort.filter.label()));

    let lines = build_cohort_lines(cohort, area.width.saturating_sub(2), theme);
    let text = if lines.is_empty() {
        Text::from(vec![
            Line::from(""),
            Line::from(Span::styled("该类别下没有作品", theme.warning)),
            Line::from(""),
            Line::from(Span::styled("Press Tab to change the category", theme.dim)),
        ])
    } else {
        Text::from(lines)
    };

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
