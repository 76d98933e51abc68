//! Journal entry input widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::JournalTheme;

const TITLE: &str = " Scribe Your Day's Tale ";
const BUSY_TITLE: &str = " Conjuring Your Chapter... ";
const PLACEHOLDER: &str =
    "What happened today? Detail your triumphs, struggles, or simple observations...";

/// Input field for the journal entry
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a JournalTheme,
    is_active: bool,
    is_busy: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a JournalTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            is_active: true,
            is_busy: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// While busy the field is locked and the title shows progress.
    pub fn busy(mut self, busy: bool) -> Self {
        self.is_busy = busy;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.is_busy {
            Span::styled(BUSY_TITLE, self.theme.busy_style())
        } else {
            Span::styled(TITLE, self.theme.title_style())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active && !self.is_busy));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.is_busy {
            Line::from(Span::styled(
                "The quill moves on its own...",
                self.theme.hint_style(),
            ))
        } else if self.content.is_empty() {
            Line::from(vec![
                Span::styled("> ", self.theme.entry_style()),
                Span::styled(PLACEHOLDER, self.theme.hint_style()),
            ])
        } else {
            let before_cursor: String = self.content.chars().take(self.cursor_position).collect();
            let at_cursor = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after_cursor: String = self.content.chars().skip(self.cursor_position + 1).collect();

            let cursor_style = if self.is_active {
                Style::default()
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                    .fg(self.theme.entry_text)
            } else {
                self.theme.entry_style()
            };

            Line::from(vec![
                Span::styled("> ", self.theme.entry_style()),
                Span::styled(before_cursor, self.theme.entry_style()),
                Span::styled(at_cursor, cursor_style),
                Span::styled(after_cursor, self.theme.entry_style()),
            ])
        };

        Paragraph::new(line)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
