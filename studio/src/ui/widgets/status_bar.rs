//! Status bar and hotkey bar widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::InputMode;
use crate::ui::theme::StudioTheme;
use crate::worker::SessionSnapshot;

/// Status bar: project, config, backend, stage, and the status message.
pub struct StatusBarWidget<'a> {
    snapshot: &'a SessionSnapshot,
    input_mode: InputMode,
    working: bool,
    theme: &'a StudioTheme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(
        snapshot: &'a SessionSnapshot,
        input_mode: InputMode,
        working: bool,
        theme: &'a StudioTheme,
    ) -> Self {
        Self {
            snapshot,
            input_mode,
            working,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    fn mode_span(&self) -> Span<'static> {
        let (label, color) = match self.input_mode {
            InputMode::Normal => ("NORMAL", self.theme.foreground),
            InputMode::Insert => ("INSERT", self.theme.premise_text),
            InputMode::Command => ("COMMAND", self.theme.card_text),
            InputMode::Edit => ("EDIT", self.theme.stale_warning),
        };
        Span::styled(
            format!(" {label} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.snapshot;

        let mut spans = vec![
            self.mode_span(),
            Span::raw("| "),
            Span::styled(
                format!("{} ({}, {})", s.project_name, s.genre, s.tone),
                Style::default().fg(self.theme.foreground),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("Stage: {}", s.stage),
                Style::default().fg(self.theme.report_text),
            ),
        ];

        if s.backend == "mock" {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "MOCK",
                Style::default()
                    .fg(self.theme.mock_badge)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if self.working {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "Working...",
                Style::default().fg(self.theme.working),
            ));
        }

        if let Some(message) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                message.to_string(),
                self.theme.system_style(),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

/// One-line hotkey hints, varying with the input mode.
pub struct HotkeyBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StudioTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StudioTheme) -> Self {
        Self { input_mode, theme }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = match self.input_mode {
            InputMode::Normal => {
                " i:premise  e:edit card  d:draft  c:critique  b:bible  Tab:focus  ?:help  q:quit "
            }
            InputMode::Insert => " Enter:generate outline  Esc:cancel  Up/Down:history ",
            InputMode::Command => " :w save  :load  :saves  :reset  :genre  :tone  :style  :q quit ",
            InputMode::Edit => " Esc:save card  Enter:newline  arrows:move ",
        };

        Paragraph::new(Line::from(Span::styled(hints, self.theme.system_style())))
            .render(area, buf);
    }
}
