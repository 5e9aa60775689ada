use ratatui::style::Style;
use ratatui::text::{Line, Span};
use report_core::formatting::format_number;
use report_data::report::SeriesPoint;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Widest label column a bar chart will reserve.
pub const MAX_LABEL_WIDTH: usize = 24;

/// Configuration controlling visual appearance of a bar.
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding labels).
    pub width: u16,
    /// Character used for the filled portion.
    pub filled_char: char,
    /// Character used for the unfilled portion.
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ValueBar ──────────────────────────────────────────────────────────────────

/// One horizontal bar: `<label> <fill><empty> <value>`.
///
/// The fill is `value / axis_max` of the configured width; the value label
/// is rounded to whole minutes.
pub struct ValueBar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub axis_max: f64,
    /// Display columns reserved for the label.
    pub label_width: usize,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> ValueBar<'a> {
    pub fn new(label: &'a str, value: f64, axis_max: f64, style: Style, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            axis_max,
            label_width: label.width().min(MAX_LABEL_WIDTH),
            style,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Columns of the filled portion.
    pub fn filled_width(&self) -> u16 {
        if self.axis_max <= 0.0 || !self.value.is_finite() {
            return 0;
        }
        let ratio = (self.value / self.axis_max).clamp(0.0, 1.0);
        (ratio * self.config.width as f64).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_width();
        let empty = self.config.width.saturating_sub(filled);

        let filled_str = self.config.filled_char.to_string().repeat(filled as usize);
        let empty_str = self.config.empty_char.to_string().repeat(empty as usize);

        Line::from(vec![
            Span::styled(pad_to_width(self.label, self.label_width), self.theme.label),
            Span::raw(" "),
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(
                format!(" {}", format_number(self.value, 0)),
                self.theme.bar_label,
            ),
        ])
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Pad (or truncate with `…`) `text` to exactly `width` display columns.
///
/// CJK characters occupy two columns, so padding is computed from display
/// width rather than `char` count.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Label column width for a set of points, capped at [`MAX_LABEL_WIDTH`].
pub fn label_width(points: &[SeriesPoint]) -> usize {
    points
        .iter()
        .map(|p| p.label.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH)
}

/// Bar columns left in `total_width` after the label column and value label.
pub fn bar_width_for(total_width: u16, label_width: usize, axis_max: f64) -> u16 {
    let value_width = format_number(axis_max, 0).width() + 1;
    let reserved = (label_width + 1 + value_width) as u16;
    total_width.saturating_sub(reserved).max(1)
}

/// One line per point, all sharing the same label column and axis.
pub fn bar_lines<'a>(
    points: &'a [SeriesPoint],
    axis_max: f64,
    total_width: u16,
    style: Style,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let label_width = label_width(points);
    let bar_width = bar_width_for(total_width, label_width, axis_max);
    points
        .iter()
        .map(|p| {
            ValueBar::new(&p.label, p.value, axis_max, style, theme)
                .with_label_width(label_width)
                .with_width(bar_width)
                .to_line()
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
