//! TUI widgets for the studio

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub mod blueprint;
pub mod input;
pub mod manuscript;
pub mod status_bar;

pub use blueprint::BlueprintWidget;
pub use input::InputWidget;
pub use manuscript::ManuscriptWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};

/// Render a line with the character at `col` highlighted as a block cursor.
/// `col` is a character index, not a byte index.
pub(crate) fn line_with_cursor(text: &str, col: usize, style: Style) -> Line<'static> {
    let before: String = text.chars().take(col).collect();
    let at = text
        .chars()
        .nth(col)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = if col < text.chars().count() {
        text.chars().skip(col + 1).collect()
    } else {
        String::new()
    };

    Line::from(vec![
        Span::styled(before, style),
        Span::styled(at, style.add_modifier(Modifier::REVERSED | Modifier::BOLD)),
        Span::styled(after, style),
    ])
}
