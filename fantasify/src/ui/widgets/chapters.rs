//! Chapter feed widget

use fantasify_core::StoryChapter;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use crate::ui::theme::JournalTheme;

/// Shows chapters newest first, or an invitation when there are none.
pub struct ChapterFeedWidget<'a> {
    chapters: Vec<&'a StoryChapter>,
    hero_name: &'a str,
    scroll: usize,
    theme: &'a JournalTheme,
    focused: bool,
}

impl<'a> ChapterFeedWidget<'a> {
    /// `chapters` must already be in display order (newest first).
    pub fn new(
        chapters: impl IntoIterator<Item = &'a StoryChapter>,
        hero_name: &'a str,
        theme: &'a JournalTheme,
    ) -> Self {
        Self {
            chapters: chapters.into_iter().collect(),
            hero_name,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn empty_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("The Chronicle of {}", self.hero_name),
                self.theme.title_style(),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled(
                "Your story awaits its first chapter. Write in your journal below to begin the legend.",
                self.theme.hint_style(),
            ))
            .alignment(Alignment::Center),
        ]
    }

    fn chapter_lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        for (i, chapter) in self.chapters.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(self.theme.border),
                )));
                lines.push(Line::from(""));
            }

            lines.push(Line::from(Span::styled(
                chapter.chapter_title.clone(),
                self.theme.title_style(),
            )));
            lines.push(Line::from(Span::styled(
                chapter.display_date(),
                self.theme.date_style(),
            )));
            lines.push(Line::from(vec![
                Span::styled("Illustration: ", self.theme.hint_style()),
                Span::styled(chapter.image_url.clone(), self.theme.image_style()),
            ]));
            lines.push(Line::from(""));

            for line in chapter.story.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    self.theme.story_style(),
                )));
            }
            lines.push(Line::from(""));
        }

        lines
    }
}

impl Widget for ChapterFeedWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Chapters ({}) ", self.chapters.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = if self.chapters.is_empty() {
            self.empty_lines()
        } else {
            self.chapter_lines()
        };

        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
