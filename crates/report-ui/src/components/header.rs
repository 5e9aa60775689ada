use crate::themes::Theme;
use ratatui::text::{Line, Span};
use report_core::models::CategoryFilter;

/// Decorative string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

pub const TITLE: &str = " 作品使用分析 ";

/// Report header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Source file and active filter in `[ source | filter | normalizer ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded export.
    pub source: &'a str,
    pub filter: CategoryFilter,
    /// Name of the normalizer used for project names.
    pub normalizer: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        source: &'a str,
        filter: CategoryFilter,
        normalizer: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            filter,
            normalizer,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_accent),
                Span::styled(TITLE, self.theme.header),
                Span::styled(SPARKLES, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.filter.label(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.normalizer, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
