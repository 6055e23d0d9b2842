//! Render orchestration for the studio TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{BlueprintWidget, HotkeyBarWidget, InputWidget, ManuscriptWidget, StatusBarWidget};

/// Which column is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Blueprint,
    Manuscript,
}

/// Overlay types
#[derive(Debug, Clone, Copy)]
pub enum Overlay {
    Help,
    Bible,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill the whole frame with the theme background
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);

    // Blueprint column
    let editor = if app.input_mode == InputMode::Edit {
        Some(&app.editor)
    } else {
        None
    };
    let blueprint = BlueprintWidget::new(&app.snapshot.premise, &app.snapshot.scene_card, &app.theme)
        .scroll(app.blueprint_scroll)
        .focused(matches!(app.focused_panel, FocusedPanel::Blueprint))
        .editing(editor);
    frame.render_widget(blueprint, layout.blueprint_area);

    // Manuscript column
    let manuscript = ManuscriptWidget::new(app.visible_draft(), &app.snapshot.report, &app.theme)
        .scroll(app.manuscript_scroll)
        .focused(matches!(app.focused_panel, FocusedPanel::Manuscript))
        .streaming(app.streaming_draft.is_some())
        .stale(app.snapshot.draft_stale);
    frame.render_widget(manuscript, layout.manuscript_area);

    // Status bar
    let status = StatusBarWidget::new(&app.snapshot, app.input_mode, app.working, &app.theme)
        .message(app.status_message());
    frame.render_widget(status, layout.status_bar);

    // Hotkey bar
    frame.render_widget(
        HotkeyBarWidget::new(app.input_mode, &app.theme),
        layout.hotkey_bar,
    );

    // Input area
    render_input(frame, app, layout.input_area);

    // Overlay if present
    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Help => render_help_overlay(frame, app, area),
            Overlay::Bible => render_bible_overlay(frame, app, area),
        }
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " AI Novelist Studio | {} | {} ",
        app.snapshot.project_name, app.snapshot.style
    );

    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the input area
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = matches!(app.input_mode, InputMode::Insert | InputMode::Command);
    let is_command = matches!(app.input_mode, InputMode::Command);

    let placeholder = if app.working {
        "Working..."
    } else {
        "Enter a chapter premise..."
    };

    let input_widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(is_active)
        .command_mode(is_command)
        .placeholder(placeholder);

    frame.render_widget(input_widget, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 26, area);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " AI Novelist Studio - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pipeline:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  i       Type a chapter premise, Enter outlines"),
        Line::from("  e       Edit the scene card (Esc saves)"),
        Line::from("  d       Write a draft from the card"),
        Line::from("  c       Critique the draft, update the bible"),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation (NORMAL mode):",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  j/k or ↑/↓     Scroll focused column"),
        Line::from("  PgUp/PgDn      Scroll by page"),
        Line::from("  g              Jump to top"),
        Line::from("  Tab            Switch column"),
        Line::from("  b              Story bible overlay"),
        Line::from(""),
        Line::from(Span::styled(
            "Commands:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  :w [path]      Save project (timestamped file)"),
        Line::from("  :load [path]   Load project (latest if no path)"),
        Line::from("  :saves         List save files"),
        Line::from("  :reset         Clear all slots and the bible"),
        Line::from("  :genre/:tone/:style   Change project settings"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render story bible overlay
fn render_bible_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(60, 20, area);

    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Story So Far",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for text in app.snapshot.bible_summary.lines() {
        lines.push(Line::from(text.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Characters",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if app.snapshot.characters.is_empty() {
        lines.push(Line::from(Span::styled(
            "None tracked yet.",
            app.theme.system_style(),
        )));
    } else {
        for (name, description) in &app.snapshot.characters {
            lines.push(Line::from(vec![
                Span::styled(
                    name.clone(),
                    Style::default().fg(app.theme.card_text),
                ),
                Span::raw(": "),
                Span::raw(description.clone()),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or q to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Story Bible ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
