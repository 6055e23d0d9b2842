//! Main application state and logic

use std::collections::VecDeque;
use std::path::PathBuf;

use studio_core::persist;
use studio_core::{Genre, Tone};
use tokio::sync::mpsc;

use crate::ui::theme::StudioTheme;
use crate::ui::{FocusedPanel, Overlay};
use crate::worker::{SessionSnapshot, WorkerRequest, WorkerResponse, SAVE_DIR};

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing a chapter premise
    Insert,
    /// Command mode - entering : commands
    Command,
    /// Edit mode - editing the scene card in place
    Edit,
}

/// In-place editor state for the scene card.
#[derive(Debug, Clone, Default)]
pub struct CardEditor {
    pub lines: Vec<String>,
    pub row: usize,
    /// Column as a character index, not a byte index.
    pub col: usize,
}

/// Main application state
pub struct App {
    // Channel communication with the session worker
    pub request_tx: mpsc::Sender<WorkerRequest>,
    pub response_rx: mpsc::UnboundedReceiver<WorkerResponse>,

    // Session state snapshot for rendering
    pub snapshot: SessionSnapshot,

    // UI state
    pub theme: StudioTheme,
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,

    // Streaming draft text, shown until the next snapshot arrives
    pub streaming_draft: Option<String>,

    // Scroll state per column
    pub blueprint_scroll: usize,
    pub manuscript_scroll: usize,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Scene card editor
    pub editor: CardEditor,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
    pub quit_after_save: bool,

    // Generation in flight
    pub working: bool,
}

impl App {
    /// Create a new application with channel endpoints and initial state.
    pub fn new(
        request_tx: mpsc::Sender<WorkerRequest>,
        response_rx: mpsc::UnboundedReceiver<WorkerResponse>,
        snapshot: SessionSnapshot,
    ) -> Self {
        let mut app = Self {
            request_tx,
            response_rx,
            snapshot,
            theme: StudioTheme::default(),
            focused_panel: FocusedPanel::default(),
            overlay: None,
            streaming_draft: None,
            blueprint_scroll: 0,
            manuscript_scroll: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(100),
            history_index: None,
            saved_input: None,
            editor: CardEditor::default(),
            status_message: None,
            should_quit: false,
            quit_after_save: false,
            working: false,
        };

        if app.snapshot.backend == "mock" {
            app.set_status("Mock mode: no API key, generators return fixtures");
        } else {
            app.set_status("Press 'i' to enter a premise, '?' for help");
        }

        app
    }

    /// Drain pending worker responses. Returns true if anything changed.
    pub fn drain_responses(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.response_rx.try_recv() {
            changed = true;
            match response {
                WorkerResponse::Snapshot(snapshot) => {
                    self.snapshot = snapshot;
                    self.streaming_draft = None;
                    self.working = false;
                    if self.quit_after_save {
                        self.should_quit = true;
                    }
                }
                WorkerResponse::DraftDelta(chunk) => {
                    match &mut self.streaming_draft {
                        Some(text) => text.push_str(&chunk),
                        None => self.streaming_draft = Some(chunk),
                    }
                }
                WorkerResponse::Status(message) => self.set_status(message),
                WorkerResponse::Error(message) => {
                    self.set_status(format!("Error: {message}"));
                    self.quit_after_save = false;
                }
            }
        }
        changed
    }

    /// Send a request to the worker (non-blocking).
    pub fn send_request(&mut self, request: WorkerRequest) {
        let generates = matches!(
            request,
            WorkerRequest::GenerateOutline(_)
                | WorkerRequest::WriteDraft
                | WorkerRequest::RunCritique
        );

        if self.request_tx.try_send(request).is_err() {
            self.set_status("Still working, please wait...");
            return;
        }

        if generates {
            self.working = true;
            self.set_status("Working...");
        }
    }

    // =========================================================================
    // Mode transitions
    // =========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.input_buffer.starts_with(':') {
            self.input_buffer.clear();
            self.cursor_position = 0;
        }
    }

    /// Open the scene card editor with the current card text.
    pub fn open_card_editor(&mut self) {
        if self.snapshot.scene_card.is_empty() {
            self.set_status("No scene card yet: enter a premise first");
            return;
        }
        self.editor.lines = self
            .snapshot
            .scene_card
            .lines()
            .map(|l| l.to_string())
            .collect();
        self.editor.row = 0;
        self.editor.col = 0;
        self.input_mode = InputMode::Edit;
        self.set_status("EDIT card: Esc saves, arrows move");
    }

    /// Close the editor and push the edited card to the worker.
    pub fn commit_card_editor(&mut self) {
        let text = self.editor.lines.join("\n");
        self.editor = CardEditor::default();
        self.input_mode = InputMode::Normal;
        self.send_request(WorkerRequest::SetSceneCard(text));
    }

    // =========================================================================
    // Card editor ops (unicode-safe)
    // =========================================================================

    pub fn editor_type_char(&mut self, c: char) {
        if let Some(line) = self.editor.lines.get_mut(self.editor.row) {
            let byte_pos = line
                .char_indices()
                .nth(self.editor.col)
                .map(|(i, _)| i)
                .unwrap_or(line.len());
            line.insert(byte_pos, c);
            self.editor.col += 1;
        }
    }

    pub fn editor_backspace(&mut self) {
        if self.editor.col > 0 {
            self.editor.col -= 1;
            if let Some(line) = self.editor.lines.get_mut(self.editor.row) {
                if let Some((byte_pos, ch)) = line.char_indices().nth(self.editor.col) {
                    line.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
                }
            }
        } else if self.editor.row > 0 {
            // Join with the previous line
            let current = self.editor.lines.remove(self.editor.row);
            self.editor.row -= 1;
            let prev = &mut self.editor.lines[self.editor.row];
            self.editor.col = prev.chars().count();
            prev.push_str(&current);
        }
    }

    pub fn editor_newline(&mut self) {
        if let Some(line) = self.editor.lines.get_mut(self.editor.row) {
            let byte_pos = line
                .char_indices()
                .nth(self.editor.col)
                .map(|(i, _)| i)
                .unwrap_or(line.len());
            let rest = line.split_off(byte_pos);
            self.editor.lines.insert(self.editor.row + 1, rest);
            self.editor.row += 1;
            self.editor.col = 0;
        }
    }

    pub fn editor_move(&mut self, d_row: isize, d_col: isize) {
        if d_row != 0 {
            let rows = self.editor.lines.len();
            let new_row = self.editor.row as isize + d_row;
            self.editor.row = new_row.clamp(0, rows.saturating_sub(1) as isize) as usize;
        }
        let line_len = self
            .editor
            .lines
            .get(self.editor.row)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        if d_col != 0 {
            let new_col = self.editor.col as isize + d_col;
            self.editor.col = new_col.clamp(0, line_len as isize) as usize;
        } else {
            self.editor.col = self.editor.col.min(line_len);
        }
    }

    // =========================================================================
    // Input buffer ops (unicode-safe)
    // =========================================================================

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        if !input.starts_with(':') {
            self.input_history.push_front(input.clone());
            if self.input_history.len() > 100 {
                self.input_history.pop_back();
            }
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    /// Move cursor to start
    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Move cursor to end (unicode-safe)
    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        if self.history_index.is_none() && !self.input_buffer.is_empty() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let new_index = match self.history_index {
            None => Some(0),
            Some(i) if i + 1 < self.input_history.len() => Some(i + 1),
            Some(i) => Some(i),
        };

        if let Some(idx) = new_index {
            if let Some(entry) = self.input_history.get(idx) {
                self.input_buffer = entry.clone();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = new_index;
            }
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        match self.focused_panel {
            FocusedPanel::Blueprint => {
                self.blueprint_scroll = self.blueprint_scroll.saturating_sub(lines)
            }
            FocusedPanel::Manuscript => {
                self.manuscript_scroll = self.manuscript_scroll.saturating_sub(lines)
            }
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        match self.focused_panel {
            FocusedPanel::Blueprint => {
                self.blueprint_scroll = self.blueprint_scroll.saturating_add(lines)
            }
            FocusedPanel::Manuscript => {
                self.manuscript_scroll = self.manuscript_scroll.saturating_add(lines)
            }
        }
    }

    pub fn scroll_to_top(&mut self) {
        match self.focused_panel {
            FocusedPanel::Blueprint => self.blueprint_scroll = 0,
            FocusedPanel::Manuscript => self.manuscript_scroll = 0,
        }
    }

    /// Cycle focus between the two columns.
    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Blueprint => FocusedPanel::Manuscript,
            FocusedPanel::Manuscript => FocusedPanel::Blueprint,
        };
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Toggle story bible overlay
    pub fn toggle_bible(&mut self) {
        if matches!(self.overlay, Some(Overlay::Bible)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Bible);
        }
    }

    /// Close any open overlay
    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Get the current overlay
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Check if an overlay is currently open
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Process a colon command.
    pub fn process_command(&mut self, command: &str) {
        let cmd = command.trim_start_matches(':');
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        let Some(&head) = parts.first() else {
            return;
        };

        match head {
            "q" | "quit" | "exit" => {
                self.should_quit = true;
            }
            "w" | "save" => {
                self.set_status("Saving...");
                let path = self.save_path(parts.get(1).copied());
                self.send_request(WorkerRequest::Save(path));
            }
            "load" => {
                self.set_status("Loading...");
                // No path loads the most recent save
                let path = parts.get(1).copied().map(PathBuf::from);
                self.send_request(WorkerRequest::Load(path));
            }
            "saves" => {
                let dir = parts.get(1).copied().unwrap_or(SAVE_DIR);
                self.send_request(WorkerRequest::ListSaves(PathBuf::from(dir)));
            }
            "wq" => {
                self.set_status("Saving and quitting...");
                self.quit_after_save = true;
                let path = self.save_path(parts.get(1).copied());
                self.send_request(WorkerRequest::Save(path));
            }
            "reset" => {
                self.send_request(WorkerRequest::Reset);
            }
            "genre" => match parts.get(1).and_then(|s| Genre::parse(s)) {
                Some(genre) => self.send_request(WorkerRequest::SetGenre(genre)),
                None => self.set_status("Usage: :genre <techno-thriller|cyberpunk|fantasy|romance>"),
            },
            "tone" => match parts.get(1).and_then(|s| Tone::parse(s)) {
                Some(tone) => self.send_request(WorkerRequest::SetTone(tone)),
                None => self.set_status("Usage: :tone <light|balanced|gritty|dark>"),
            },
            "style" => {
                if parts.len() > 1 {
                    let style = parts[1..].join(" ");
                    self.send_request(WorkerRequest::SetStyle(style));
                } else {
                    self.set_status("Usage: :style <author style directive>");
                }
            }
            "help" | "h" => {
                self.toggle_help();
            }
            _ => {
                self.set_status(format!("Unknown command: {head}"));
            }
        }
    }

    /// Resolve a save target: an explicit path, or a timestamped file in the
    /// save directory named after the project.
    fn save_path(&self, explicit: Option<&str>) -> PathBuf {
        match explicit {
            Some(path) => PathBuf::from(path),
            None => persist::manual_save_path(SAVE_DIR, &self.snapshot.project_name),
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Get the current status message
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Get the current input buffer
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Get the current cursor position
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// The draft text to render: the streaming buffer while a draft is in
    /// flight, otherwise the snapshot's draft.
    pub fn visible_draft(&self) -> &str {
        match &self.streaming_draft {
            Some(text) => text,
            None => &self.snapshot.draft,
        }
    }
}
