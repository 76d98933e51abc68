//! Render orchestration for the journal TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, StatusKind};
use crate::ui::widgets::{ChapterFeedWidget, InputWidget};

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    ConfirmReset,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(5),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);

    let hero_name = app
        .session
        .profile()
        .map(|p| p.name.as_str())
        .unwrap_or("Nobody");
    let feed = ChapterFeedWidget::new(app.session.feed(), hero_name, &app.theme)
        .scroll(app.feed_scroll)
        .focused(app.input_mode == InputMode::Normal);
    frame.render_widget(feed, chunks[1]);

    render_status_bar(frame, app, chunks[2]);

    let input = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(app.input_mode == InputMode::Insert)
        .busy(app.generating);
    frame.render_widget(input, chunks[3]);

    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Help => render_help_overlay(frame, app, area),
            Overlay::ConfirmReset => render_confirm_reset(frame, app, area),
        }
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.session.profile() {
        Some(profile) => format!(
            " ✦ Fantasify ✦  {} of the {} ",
            profile.name, profile.setting
        ),
        None => " ✦ Fantasify ✦ ".to_string(),
    };

    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Insert => " WRITE ",
    };

    let mut spans = vec![
        Span::styled(
            mode,
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    match app.status() {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => app.theme.story_style(),
                StatusKind::Warning => app.theme.warning_style(),
                StatusKind::Error => app.theme.error_style(),
            };
            spans.push(Span::styled(status.text.clone(), style));
        }
        None => {
            let hint = match app.input_mode {
                InputMode::Insert => "Enter: Fantasify My Entry | Esc: browse chapters",
                InputMode::Normal => "i: write | j/k: scroll | R: reset | ?: help | q: quit",
            };
            spans.push(Span::styled(hint, app.theme.hint_style()));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 18, area);
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Fantasify - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Writing (WRITE mode):", heading)),
        Line::from("  Enter          Fantasify the entry"),
        Line::from("  Esc            Browse chapters"),
        Line::from(""),
        Line::from(Span::styled("Browsing (NORMAL mode):", heading)),
        Line::from("  i / Enter      Write a new entry"),
        Line::from("  j/k or ↑/↓     Scroll"),
        Line::from("  g/G            Newest/oldest chapter"),
        Line::from("  R              Reset the adventure"),
        Line::from("  q              Quit"),
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

    frame.render_widget(
        Paragraph::new(help_text).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

/// Render the reset confirmation
fn render_confirm_reset(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(50, 7, area);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(Span::styled(
            "Are you sure you want to erase this entire adventure? This cannot be undone.",
            app.theme.warning_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("y: erase    n: keep", app.theme.hint_style())),
    ];

    let block = Block::default()
        .title(" Reset Adventure ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

/// A rectangle of at most `width` x `height`, centered in `area`.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
