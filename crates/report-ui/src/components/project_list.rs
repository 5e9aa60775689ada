use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use report_core::formatting::{display_project_name, format_number};
use report_core::models::ProjectCategory;
use report_data::analysis::ClassifiedProject;

use crate::components::bar::pad_to_width;
use crate::themes::Theme;

/// Label of the leading "no selection" entry.
pub const NO_SELECTION_LABEL: &str = "（不选择）";

/// One selectable row of the project picker.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    /// Canonical name, `None` for the "no selection" row.
    pub name: Option<String>,
    pub total_minutes: f64,
    pub category: Option<ProjectCategory>,
}

impl ProjectEntry {
    pub fn none() -> Self {
        Self {
            name: None,
            total_minutes: 0.0,
            category: None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.name {
            Some(name) => display_project_name(name),
            None => NO_SELECTION_LABEL,
        }
    }
}

/// Picker rows: the "no selection" entry, then every project in
/// presentation order.
pub fn project_entries(projects: &[ClassifiedProject]) -> Vec<ProjectEntry> {
    std::iter::once(ProjectEntry::none())
        .chain(projects.iter().map(|p| ProjectEntry {
            name: Some(p.aggregate.name.clone()),
            total_minutes: p.aggregate.total_minutes,
            category: Some(p.category),
        }))
        .collect()
}

fn entry_line<'a>(entry: &'a ProjectEntry, label_width: usize, theme: &'a Theme) -> Line<'a> {
    let Some(category) = entry.category else {
        return Line::from(Span::styled(entry.label(), theme.dim));
    };
    Line::from(vec![
        Span::styled(pad_to_width(entry.label(), label_width), theme.list_item),
        Span::styled(format!(" {} ", category.label()), theme.category_style(category)),
        Span::styled(format_number(entry.total_minutes, 0), theme.dim),
    ])
}

/// Render the picker with `selected` highlighted and scrolled into view.
pub fn render_project_list(
    frame: &mut Frame,
    area: Rect,
    entries: &[ProjectEntry],
    selected: usize,
    theme: &Theme,
) {
    // Borders, highlight symbol, tag and a short value column.
    let label_width = (area.width as usize).saturating_sub(2 + 2 + 4 + 8).max(4);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|e| ListItem::new(entry_line(e, label_width, theme)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(format!(" 作品 ({}) ", entries.len().saturating_sub(1))),
        )
        .highlight_style(theme.list_selected)
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use report_core::models::ProjectAggregate;

    fn classified(name: &str, total: f64, category: ProjectCategory) -> ClassifiedProject {
        ClassifiedProject {
            aggregate: ProjectAggregate {
                name: name.to_string(),
                total_minutes: total,
                first_usage: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                record_count: 1,
                store_count: 1,
            },
            category,
        }
    }

    #[test]
    fn test_entries_start_with_no_selection() {
        let entries = project_entries(&[
            classified("机械臂", 60.0, ProjectCategory::Hardware),
            classified("射箭比赛", 40.0, ProjectCategory::Software),
        ]);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ProjectEntry::none());
        assert_eq!(entries[0].label(), NO_SELECTION_LABEL);
        assert_eq!(entries[1].name.as_deref(), Some("机械臂"));
        assert_eq!(entries[2].category, Some(ProjectCategory::Software));
    }

    #[test]
    fn test_empty_name_entry_label() {
        let entries = project_entries(&[classified("", 3.0, ProjectCategory::Software)]);
        assert_eq!(entries[1].label(), report_core::formatting::UNNAMED_PROJECT);
        assert_eq!(entries[1].name.as_deref(), Some(""));
    }

    #[test]
    fn test_render_project_list_does_not_panic() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let entries = project_entries(&[
            classified("机械臂", 60.0, ProjectCategory::Hardware),
            classified("射箭比赛", 40.0, ProjectCategory::Software),
        ]);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_project_list(frame, area, &entries, 2, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_project_list_tiny_area_does_not_panic() {
        let backend = TestBackend::new(6, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let entries = vec![ProjectEntry::none()];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_project_list(frame, area, &entries, 0, &theme);
            })
            .unwrap();
    }
}
