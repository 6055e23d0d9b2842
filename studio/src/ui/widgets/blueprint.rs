//! Blueprint column: premise and scene card

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::CardEditor;
use crate::ui::theme::StudioTheme;
use crate::ui::widgets::line_with_cursor;

/// Left column: the chapter premise and the (editable) scene card.
pub struct BlueprintWidget<'a> {
    premise: &'a str,
    scene_card: &'a str,
    theme: &'a StudioTheme,
    scroll: usize,
    focused: bool,
    /// When present, the card is rendered from the editor with a cursor.
    editor: Option<&'a CardEditor>,
}

impl<'a> BlueprintWidget<'a> {
    pub fn new(premise: &'a str, scene_card: &'a str, theme: &'a StudioTheme) -> Self {
        Self {
            premise,
            scene_card,
            theme,
            scroll: 0,
            focused: false,
            editor: None,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editor: Option<&'a CardEditor>) -> Self {
        self.editor = editor;
        self
    }

    fn card_lines(&self) -> Vec<Line<'static>> {
        let style = self.theme.card_style();
        let mut lines = Vec::new();

        match self.editor {
            Some(editor) => {
                for (row, text) in editor.lines.iter().enumerate() {
                    if row == editor.row {
                        lines.push(line_with_cursor(text, editor.col, style));
                    } else {
                        lines.push(Line::from(Span::styled(text.clone(), style)));
                    }
                }
            }
            None => {
                for text in self.scene_card.lines() {
                    lines.push(Line::from(Span::styled(text.to_string(), style)));
                }
            }
        }

        lines
    }
}

impl Widget for BlueprintWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.editor.is_some() {
            " Blueprint [EDITING - Esc saves] "
        } else if self.focused {
            " Blueprint [j/k scroll] "
        } else {
            " Blueprint "
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused || self.editor.is_some()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            "Premise",
            self.theme.heading_style(),
        )));
        if self.premise.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press 'i' and type a chapter premise.",
                self.theme.system_style(),
            )));
        } else {
            for text in self.premise.lines() {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    self.theme.premise_style(),
                )));
            }
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            "Scene Card",
            self.theme.heading_style(),
        )));
        if self.scene_card.is_empty() && self.editor.is_none() {
            lines.push(Line::from(Span::styled(
                "No outline yet.",
                self.theme.system_style(),
            )));
        } else {
            lines.extend(self.card_lines());
        }

        let visible_height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
