//! Event handling for the studio TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};
use crate::worker::WorkerRequest;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Handle overlay keys first
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Edit => handle_edit_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (vim-style navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Mode switching
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }

        // Pipeline actions
        KeyCode::Char('e') => {
            app.open_card_editor();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('d') => {
            if app.working {
                app.set_status("Still working, please wait...");
            } else {
                app.send_request(WorkerRequest::WriteDraft);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('c') => {
            if app.working {
                app.set_status("Still working, please wait...");
            } else {
                app.send_request(WorkerRequest::RunCritique);
            }
            EventResult::NeedsRedraw
        }

        // Overlays
        KeyCode::Char('b') => {
            app.toggle_bible();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Quit
        KeyCode::Char('q') => EventResult::Quit,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.scroll_to_top();
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }

        // Panel focus cycling
        KeyCode::Tab | KeyCode::BackTab => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (typing a chapter premise)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }

        // Submit the premise. Refused while a generation is in flight;
        // the typed text stays in the buffer.
        KeyCode::Enter => {
            if app.working {
                app.set_status("Still working, please wait...");
            } else if let Some(premise) = app.submit_input() {
                app.send_request(WorkerRequest::GenerateOutline(premise));
                app.enter_normal_mode();
            }
            EventResult::NeedsRedraw
        }

        // Input editing
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.history_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.history_next();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.clear_input();
            EventResult::NeedsRedraw
        }

        KeyCode::Enter => {
            let command = app.input_buffer().to_string();
            app.clear_input();
            app.input_mode = InputMode::Normal;

            if command.len() > 1 {
                app.process_command(&command);
            }

            if app.should_quit {
                EventResult::Quit
            } else {
                EventResult::NeedsRedraw
            }
        }

        KeyCode::Left => {
            if app.cursor_position() > 1 {
                app.cursor_left();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            if app.cursor_position() > 1 {
                app.backspace();
            } else {
                // Backspace on just ":" exits command mode
                app.input_mode = InputMode::Normal;
                app.clear_input();
            }
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in EDIT mode (scene card editor)
fn handle_edit_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Esc commits the edited card
        KeyCode::Esc => {
            app.commit_card_editor();
            EventResult::NeedsRedraw
        }

        KeyCode::Enter => {
            app.editor_newline();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.editor_backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.editor_move(-1, 0);
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.editor_move(1, 0);
            EventResult::NeedsRedraw
        }
        KeyCode::Left => {
            app.editor_move(0, -1);
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.editor_move(0, 1);
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.editor_type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{self, WorkerResponse};
    use studio_core::{MockNovelist, NovelistBackend, StudioConfig, StudioSession};
    use tokio::sync::mpsc;

    fn test_app() -> (App, mpsc::Receiver<WorkerRequest>) {
        let (request_tx, request_rx) = mpsc::channel(8);
        let (_response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();
        let session = StudioSession::with_backend(
            StudioConfig::new("Test"),
            NovelistBackend::Mock(MockNovelist::instant()),
        );
        let app = App::new(request_tx, response_rx, worker::snapshot(&session));
        (app, request_rx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_premise_submit_sends_outline_request() {
        let (mut app, mut rx) = test_app();

        handle_event(&mut app, key(KeyCode::Char('i')));
        type_line(&mut app, "a heist goes wrong");
        handle_event(&mut app, key(KeyCode::Enter));

        match rx.try_recv() {
            Ok(WorkerRequest::GenerateOutline(premise)) => {
                assert_eq!(premise, "a heist goes wrong")
            }
            other => panic!("Expected GenerateOutline, got {other:?}"),
        }
        assert!(app.working);
    }

    #[test]
    fn test_premise_submit_refused_while_working() {
        let (mut app, mut rx) = test_app();
        app.working = true;

        handle_event(&mut app, key(KeyCode::Char('i')));
        type_line(&mut app, "second premise");
        handle_event(&mut app, key(KeyCode::Enter));

        assert!(rx.try_recv().is_err(), "No request should be queued");
        assert_eq!(app.status_message(), Some("Still working, please wait..."));
        // The typed premise is not lost
        assert_eq!(app.input_buffer(), "second premise");
    }

    #[test]
    fn test_draft_and_critique_refused_while_working() {
        let (mut app, mut rx) = test_app();
        app.working = true;

        handle_event(&mut app, key(KeyCode::Char('d')));
        handle_event(&mut app, key(KeyCode::Char('c')));

        assert!(rx.try_recv().is_err(), "No request should be queued");
    }
}
