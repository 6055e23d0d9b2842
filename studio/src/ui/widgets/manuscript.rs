//! Manuscript column: draft prose and editorial report

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::StudioTheme;

/// Right column: the chapter draft and the editorial report.
pub struct ManuscriptWidget<'a> {
    draft: &'a str,
    report: &'a str,
    theme: &'a StudioTheme,
    scroll: usize,
    focused: bool,
    streaming: bool,
    stale: bool,
}

impl<'a> ManuscriptWidget<'a> {
    pub fn new(draft: &'a str, report: &'a str, theme: &'a StudioTheme) -> Self {
        Self {
            draft,
            report,
            theme,
            scroll: 0,
            focused: false,
            streaming: false,
            stale: false,
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

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn stale(mut self, stale: bool) -> Self {
        self.stale = stale;
        self
    }
}

impl Widget for ManuscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Manuscript [j/k scroll] "
        } else {
            " Manuscript "
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled("Draft", self.theme.heading_style())));
        if self.stale {
            lines.push(Line::from(Span::styled(
                "! Scene card changed since this draft. Press 'd' to redraft.",
                self.theme.stale_style(),
            )));
        }
        if self.draft.is_empty() {
            lines.push(Line::from(Span::styled(
                "No draft yet. Press 'd' once a scene card exists.",
                self.theme.system_style(),
            )));
        } else {
            let style = if self.streaming {
                self.theme.draft_style().add_modifier(Modifier::DIM)
            } else {
                self.theme.draft_style()
            };
            for text in self.draft.lines() {
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
            if self.streaming {
                lines.push(Line::from(Span::styled("▌", style)));
            }
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            "Editorial Report",
            self.theme.heading_style(),
        )));
        if self.report.is_empty() {
            lines.push(Line::from(Span::styled(
                "No report yet. Press 'c' once a draft exists.",
                self.theme.system_style(),
            )));
        } else {
            for text in self.report.lines() {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    self.theme.report_style(),
                )));
            }
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
