//! Main application state and logic

use fantasify_core::session::SAVE_WARNING;
use fantasify_core::JournalSession;

use crate::ui::theme::JournalTheme;
use crate::ui::Overlay;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - scrolling and hotkeys
    Normal,
    /// Insert mode - writing the journal entry (default)
    #[default]
    Insert,
}

/// How loud a status message is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// A message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Main application state
pub struct App {
    pub session: JournalSession,

    // UI state
    pub theme: JournalTheme,
    overlay: Option<Overlay>,

    // Chapter feed
    pub feed_scroll: usize,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // Status
    status: Option<StatusMessage>,
    pub generating: bool,
}

impl App {
    /// Create the journal screen for a session that already has a hero.
    pub fn new(session: JournalSession) -> Self {
        let mut app = Self {
            session,
            theme: JournalTheme::default(),
            overlay: None,
            feed_scroll: 0,
            input_mode: InputMode::Insert,
            input_buffer: String::new(),
            cursor_position: 0,
            status: None,
            generating: false,
        };
        app.show_credential_warnings();
        app
    }

    /// Warn about missing API keys, if any.
    pub fn show_credential_warnings(&mut self) {
        if !self.session.can_generate() {
            self.set_error("Gemini API key is missing. Story generation will not work.");
        } else if !self.session.has_image_search() {
            self.set_warning("Unsplash access key is missing. Using basic random images.");
        }
    }

    /// Take the current entry for submission.
    ///
    /// Returns `None` (and keeps the buffer) while a chapter is being
    /// written or when the entry is blank.
    pub fn submit_input(&mut self) -> Option<String> {
        if self.generating || self.input_buffer.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;
        Some(input.trim().to_string())
    }

    /// Write the next chapter from `entry` and report the outcome.
    pub async fn write_chapter(&mut self, entry: &str) {
        self.generating = true;
        self.clear_status();

        let result = self.session.submit_entry(entry).await;
        self.generating = false;

        match result {
            Ok(submission) => {
                self.feed_scroll = 0;
                if submission.persist_warning.is_some() {
                    self.set_error(SAVE_WARNING);
                } else {
                    self.set_info(format!(
                        "A new chapter is written: {}",
                        submission.chapter.chapter_title
                    ));
                }
            }
            Err(e) => {
                self.set_error(e.to_string());
                if e.persist_warning().is_some() {
                    self.add_error(SAVE_WARNING);
                }
            }
        }
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self.byte_index(self.cursor_position);
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_pos = self.byte_index(self.cursor_position);
            self.input_buffer.remove(byte_pos);
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            let byte_pos = self.byte_index(self.cursor_position);
            self.input_buffer.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    /// Scroll the feed towards older chapters
    pub fn scroll_down(&mut self, lines: usize) {
        self.feed_scroll = self.feed_scroll.saturating_add(lines);
    }

    /// Scroll the feed towards the newest chapter
    pub fn scroll_up(&mut self, lines: usize) {
        self.feed_scroll = self.feed_scroll.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.feed_scroll = 0;
    }

    /// Scroll to the oldest chapter; the widget caps the value.
    pub fn scroll_to_bottom(&mut self) {
        self.feed_scroll = usize::MAX / 2;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Ask before erasing the adventure
    pub fn request_reset(&mut self) {
        self.overlay = Some(Overlay::ConfirmReset);
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set_status(message, StatusKind::Info);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set_status(message, StatusKind::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_status(message, StatusKind::Error);
    }

    /// Report an error without hiding the message already shown.
    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        match self.status.take() {
            Some(existing) => self.set_error(format!("{} {message}", existing.text)),
            None => self.set_error(message),
        }
    }

    fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: message.into(),
            kind,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // =========================================================================
    // Getters for private fields
    // =========================================================================

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}
