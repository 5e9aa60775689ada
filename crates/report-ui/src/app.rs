//! Main application state and TUI event loop for the works usage report.
//!
//! [`App`] owns the theme, the loaded dataset, the picker position and the
//! active category filter. Every selection change rebuilds the [`Report`]
//! from the dataset.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::debug;

use report_core::models::CategoryFilter;
use report_data::analysis::UsageDataset;
use report_data::report::{Report, ReportBuilder, Selection};

use crate::chart_view::render_project_view;
use crate::cohort_view::render_cohort_view;
use crate::components::header::Header;
use crate::components::project_list::{project_entries, render_project_list, ProjectEntry};
use crate::themes::Theme;

const PAGE_SIZE: usize = 10;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the report TUI.
pub struct App {
    pub theme: Theme,
    dataset: UsageDataset,
    /// Picker rows; index 0 is "no selection".
    entries: Vec<ProjectEntry>,
    selected: usize,
    filter: CategoryFilter,
    report: Report,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct the app and build the initial report for `selection`.
    ///
    /// A selected project that is not in the dataset falls back to no
    /// selection.
    pub fn new(dataset: UsageDataset, theme_name: &str, selection: Selection) -> Self {
        let entries = project_entries(dataset.projects());
        let selected = selection
            .project
            .as_deref()
            .and_then(|name| entries.iter().position(|e| e.name.as_deref() == Some(name)))
            .unwrap_or(0);
        let report = ReportBuilder::build(
            &dataset,
            &Selection::new(entries[selected].name.clone(), selection.filter),
        );

        Self {
            theme: Theme::from_name(theme_name),
            dataset,
            entries,
            selected,
            filter: selection.filter,
            report,
            should_quit: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn entries(&self) -> &[ProjectEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn selection(&self) -> Selection {
        Selection::new(self.entries[self.selected].name.clone(), self.filter)
    }

    // ── State changes ────────────────────────────────────────────────────────

    /// Move the picker to `index` (clamped) and rebuild if it changed.
    pub fn select(&mut self, index: usize) {
        let index = index.min(self.entries.len().saturating_sub(1));
        if index != self.selected {
            self.selected = index;
            self.rebuild();
        }
    }

    pub fn select_next(&mut self, step: usize) {
        self.select(self.selected.saturating_add(step));
    }

    pub fn select_previous(&mut self, step: usize) {
        self.select(self.selected.saturating_sub(step));
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let selection = self.selection();
        debug!(
            "Selection changed: project={:?} filter={}",
            selection.project, selection.filter
        );
        self.report = ReportBuilder::build(&self.dataset, &selection);
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(1),
            KeyCode::PageDown => self.select_next(PAGE_SIZE),
            KeyCode::PageUp => self.select_previous(PAGE_SIZE),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::Esc | KeyCode::Backspace => self.select(0),
            KeyCode::Tab | KeyCode::Char('c') => self.cycle_filter(),
            KeyCode::Char('a') => self.set_filter(CategoryFilter::All),
            KeyCode::Char('h') => self.set_filter(CategoryFilter::Hardware),
            KeyCode::Char('s') => self.set_filter(CategoryFilter::Software),
            _ => {}
        }
    }

    // ── Event loop ───────────────────────────────────────────────────────────

    /// Run the interactive report until `q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout; the terminal is
    /// restored even when drawing fails.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let source = self
            .dataset
            .metadata()
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("-");
        let header = Header::new(
            source,
            self.filter,
            self.dataset.metadata().normalizer.as_str(),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(rows[1]);

        render_project_list(frame, columns[0], &self.entries, self.selected, &self.theme);

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        render_project_view(frame, charts[0], self.report.project.as_ref(), &self.theme);
        render_cohort_view(frame, charts[1], &self.report.cohort, &self.theme);

        frame.render_widget(Paragraph::new(self.help_line()), rows[2]);
    }

    fn help_line(&self) -> Line<'_> {
        Line::from(vec![
            Span::styled("↑/↓", self.theme.info),
            Span::styled(" 选择作品  ", self.theme.dim),
            Span::styled("Tab", self.theme.info),
            Span::styled(" 切换类别  ", self.theme.dim),
            Span::styled("Esc", self.theme.info),
            Span::styled(" 取消选择  ", self.theme.dim),
            Span::styled("q", self.theme.info),
            Span::styled(" 退出", self.theme.dim),
        ])
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
