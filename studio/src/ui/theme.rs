//! Color theme and styling for the studio TUI

use ratatui::style::{Color, Modifier, Style};

/// Studio UI color theme
#[derive(Debug, Clone)]
pub struct StudioTheme {
    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub premise_text: Color,
    pub card_text: Color,
    pub draft_text: Color,
    pub report_text: Color,
    pub system_text: Color,

    // State colors
    pub stale_warning: Color,
    pub working: Color,
    pub mock_badge: Color,
}

impl Default for StudioTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            premise_text: Color::Cyan,
            card_text: Color::Yellow,
            draft_text: Color::White,
            report_text: Color::LightGreen,
            system_text: Color::DarkGray,

            stale_warning: Color::LightRed,
            working: Color::LightYellow,
            mock_badge: Color::Magenta,
        }
    }
}

impl StudioTheme {
    /// Get style for the chapter premise
    pub fn premise_style(&self) -> Style {
        Style::default()
            .fg(self.premise_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for scene card text
    pub fn card_style(&self) -> Style {
        Style::default().fg(self.card_text)
    }

    /// Get style for draft prose
    pub fn draft_style(&self) -> Style {
        Style::default().fg(self.draft_text)
    }

    /// Get style for the editorial report
    pub fn report_style(&self) -> Style {
        Style::default().fg(self.report_text)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for the stale-draft warning
    pub fn stale_style(&self) -> Style {
        Style::default()
            .fg(self.stale_warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get section heading style
    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}
