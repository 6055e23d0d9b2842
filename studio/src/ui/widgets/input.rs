//! Prompt line at the bottom of the screen.
//!
//! One field serves both Insert mode (chapter premise behind a `> ` prompt)
//! and Command mode, where the buffer's leading `:` is folded into the
//! prompt itself.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::StudioTheme;
use crate::ui::widgets::line_with_cursor;

pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a StudioTheme,
    placeholder: &'a str,
    is_active: bool,
    is_command_mode: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a StudioTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Enter a chapter premise...",
            is_active: true,
            is_command_mode: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn command_mode(mut self, is_command: bool) -> Self {
        self.is_command_mode = is_command;
        self
    }

    /// The prompt prefix, visible text, and cursor column. `None` means the
    /// placeholder should be shown instead.
    fn prompt(&self) -> Option<(&'static str, &str, usize)> {
        if self.is_command_mode {
            let text = self.content.strip_prefix(':').unwrap_or(self.content);
            Some((":", text, self.cursor_position.saturating_sub(1)))
        } else if self.content.is_empty() {
            None
        } else {
            Some(("> ", self.content, self.cursor_position))
        }
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));
        let inner = block.inner(area);
        block.render(area, buf);

        let line = match self.prompt() {
            Some((prefix, text, cursor)) => {
                let mut line =
                    line_with_cursor(text, cursor, Style::default().fg(self.theme.foreground));
                line.spans
                    .insert(0, Span::styled(prefix, self.theme.premise_style()));
                line
            }
            None => Line::from(vec![
                Span::styled("> ", self.theme.premise_style()),
                Span::styled(
                    self.placeholder,
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]),
        };

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_row(widget: InputWidget) -> String {
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.width)
            .filter_map(|x| buf.cell((x, 1)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_premise_prompt_shows_buffer() {
        let theme = StudioTheme::default();
        let row = rendered_row(InputWidget::new("a heist", &theme).cursor_position(7));
        assert!(row.contains("> a heist"), "row was: {row}");
    }

    #[test]
    fn test_command_prompt_folds_colon() {
        let theme = StudioTheme::default();
        let row = rendered_row(
            InputWidget::new(":save", &theme)
                .cursor_position(5)
                .command_mode(true),
        );
        assert!(row.contains(":save"), "row was: {row}");
        assert!(!row.contains("::"), "row was: {row}");
    }

    #[test]
    fn test_placeholder_when_idle() {
        let theme = StudioTheme::default();
        let row = rendered_row(InputWidget::new("", &theme).active(false));
        assert!(row.contains("Enter a chapter premise..."), "row was: {row}");
    }
}
