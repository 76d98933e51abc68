//! Color theme and styling for the journal TUI

use ratatui::style::{Color, Modifier, Style};

/// Journal UI color theme
#[derive(Debug, Clone)]
pub struct JournalTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Chapter colors
    pub chapter_title: Color,
    pub chapter_date: Color,
    pub story_text: Color,
    pub image_link: Color,

    // Text colors
    pub entry_text: Color,
    pub hint_text: Color,
    pub warning_text: Color,
    pub error_text: Color,
    pub busy_text: Color,
}

impl Default for JournalTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Yellow,

            chapter_title: Color::Yellow,
            chapter_date: Color::DarkGray,
            story_text: Color::White,
            image_link: Color::Blue,

            entry_text: Color::Cyan,
            hint_text: Color::DarkGray,
            warning_text: Color::LightYellow,
            error_text: Color::LightRed,
            busy_text: Color::Magenta,
        }
    }
}

impl JournalTheme {
    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get style for headings
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.chapter_title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for the highlighted list row
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn date_style(&self) -> Style {
        Style::default()
            .fg(self.chapter_date)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    pub fn image_style(&self) -> Style {
        Style::default()
            .fg(self.image_link)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Get style for the journal entry being typed
    pub fn entry_style(&self) -> Style {
        Style::default().fg(self.entry_text)
    }

    /// Get style for hints and placeholders
    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.hint_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning_text)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for the "generating" indicator
    pub fn busy_style(&self) -> Style {
        Style::default()
            .fg(self.busy_text)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    }
}
