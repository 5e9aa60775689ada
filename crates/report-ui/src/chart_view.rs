//! Selected-project charts: total usage and the per-store distribution.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use report_core::formatting::{display_project_name, format_date, format_minutes, percentage};
use report_data::report::ProjectReport;

use crate::components::bar::bar_lines;
use crate::themes::Theme;

/// Build the lines of the project panel for a content area `width` columns
/// wide.
///
/// Each chart is scaled to its own largest bar plus headroom.
pub fn build_project_lines<'a>(
    report: &'a ProjectReport,
    width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {

    let mut lines = vec![
        Line::from(vec![
            Span::styled(display_project_name(&report.name), theme.bold),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", report.category.label()),
                theme.category_style(report.category),
            ),
        ]),
        Line::from(vec![
            Span::styled("首次使用 ", theme.label),
            Span::styled(format_date(report.first_usage), theme.value),
            Span::styled("   记录 ", theme.label),
            Span::styled(report.record_count.to_string(), theme.value),
            Span::styled("   门店 ", theme.label),
            Span::styled(report.store_count.to_string(), theme.value),
        ]),
        Line::from(""),
        Line::from(Span::styled("总使用时长（分钟）", theme.header)),
    ];
    lines.extend(bar_lines(
        &report.total.points,
        report.total.axis_max(),
        width,
        theme.bar_total,
        theme,
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("各门店使用时长（分钟）", theme.header)));
    if report.stores.is_empty() {
        lines.push(Line::from(Span::styled("（无门店数据）", theme.dim)));
    } else {
        lines.extend(bar_lines(
            &report.stores.points,
            report.stores.axis_max(),
            width,
            theme.bar_store,
            theme,
        ));
        if let Some(top) = report.stores.points.first() {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} 占比最高：{} ({:.1}%)",
                    top.label,
                    format_minutes(top.value),
                    percentage(top.value, report.total_minutes(), 1)
                ),
                theme.dim,
            )));
        }
    }

    lines
}

/// Render the selected project's charts, or the selection prompt when
/// nothing is selected.
pub fn render_project_view(
    frame: &mut Frame,
    area: Rect,
    report: Option<&ProjectReport>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(" 作品使用时长 ");

    let Some(report) = report else {
        render_select_prompt(frame, area, block, theme);
        return;
    };

    let inner_width = area.width.saturating_sub(2);
    let paragraph = Paragraph::new(Text::from(build_project_lines(report, inner_width, theme)))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_select_prompt(frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("请选择一个作品", theme.info)),
        Line::from(""),
        Line::from(Span::styled("Use ↑/↓ to pick a project", theme.dim)),
    ];
    frame.render_widget(Paragraph::new(Text::from(text)).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
