//! Layout calculations for the studio TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The main two-column layout.
pub struct AppLayout {
    pub title_area: Rect,
    pub blueprint_area: Rect,
    pub manuscript_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
    pub input_area: Rect,
}

impl AppLayout {
    /// Split the frame: title, two equal columns, status, hotkeys, input.
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        Self {
            title_area: rows[0],
            blueprint_area: columns[0],
            manuscript_area: columns[1],
            status_bar: rows[2],
            hotkey_bar: rows[3],
            input_area: rows[4],
        }
    }
}

/// A centered popup of fixed size, clamped to the frame.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_split_evenly() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.blueprint_area.width, 50);
        assert_eq!(layout.manuscript_area.width, 50);
        assert_eq!(layout.blueprint_area.height, layout.manuscript_area.height);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect_fixed(50, 30, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
