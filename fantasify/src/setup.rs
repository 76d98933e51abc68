//! Hero setup screen.
//!
//! Asks for the hero's name and realm before the first chapter.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use fantasify_core::journal::MAX_NAME_LEN;
use fantasify_core::Realm;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::ui::theme::JournalTheme;

/// Which field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    Name,
    Realm,
}

/// Setup form state.
pub struct SetupScreen {
    pub field: SetupField,
    pub name: String,
    pub cursor_position: usize,
    pub list_state: ListState,
    pub finished: bool,
    pub cancelled: bool,
    theme: JournalTheme,
}

impl SetupScreen {
    pub fn new() -> Self {
        Self {
            field: SetupField::Name,
            name: String::new(),
            cursor_position: 0,
            list_state: ListState::default().with_selected(Some(0)),
            finished: false,
            cancelled: false,
            theme: JournalTheme::default(),
        }
    }

    /// The realm currently highlighted.
    pub fn realm(&self) -> Realm {
        self.list_state
            .selected()
            .and_then(|i| Realm::all().get(i))
            .copied()
            .unwrap_or_default()
    }

    /// Submission is allowed once the trimmed name is non-empty.
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Handle keyboard input.
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.cancelled = true;
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.field = match self.field {
                    SetupField::Name => SetupField::Realm,
                    SetupField::Realm => SetupField::Name,
                };
            }
            KeyCode::Enter => {
                if self.can_submit() {
                    self.finished = true;
                }
            }
            KeyCode::Esc => self.cancelled = true,
            _ => match self.field {
                SetupField::Name => self.handle_name_input(key),
                SetupField::Realm => self.handle_realm_selection(key),
            },
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        let char_count = self.name.chars().count();
        match key.code {
            KeyCode::Char(c) => {
                if char_count < MAX_NAME_LEN {
                    let byte_pos = self.byte_index(self.cursor_position);
                    self.name.insert(byte_pos, c);
                    self.cursor_position += 1;
                }
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let byte_pos = self.byte_index(self.cursor_position);
                    self.name.remove(byte_pos);
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < char_count {
                    let byte_pos = self.byte_index(self.cursor_position);
                    self.name.remove(byte_pos);
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(char_count);
            }
            KeyCode::Down => self.field = SetupField::Realm,
            _ => {}
        }
    }

    fn handle_realm_selection(&mut self, key: KeyEvent) {
        let max_items = Realm::all().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state
                    .select(Some(if i == 0 { max_items - 1 } else { i - 1 }));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some((i + 1) % max_items));
            }
            _ => {}
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.name
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.name.len())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let outer = Block::default()
            .title(" Create Your Hero ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(2),
            ])
            .split(inner);

        let intro = Paragraph::new(
            "Every great journey begins with a name. Who are you, and where does your tale unfold?",
        )
        .style(self.theme.title_style())
        .wrap(Wrap { trim: true });
        frame.render_widget(intro, chunks[0]);

        let name_focused = self.field == SetupField::Name;
        let name_text = if name_focused {
            format!("{}█", self.name)
        } else {
            self.name.clone()
        };
        let name_input = Paragraph::new(name_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Character Name ({}/{MAX_NAME_LEN}) ", self.name.chars().count()))
                    .border_style(self.theme.border_style(name_focused)),
            )
            .style(Style::default().fg(self.theme.foreground));
        frame.render_widget(name_input, chunks[1]);

        let realm_focused = self.field == SetupField::Realm;
        let items: Vec<ListItem> = Realm::all()
            .iter()
            .enumerate()
            .map(|(i, realm)| ListItem::new(format!("{}. {}", i + 1, realm.name())))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Choose Your Realm ")
                    .border_style(self.theme.border_style(realm_focused)),
            )
            .highlight_style(self.theme.selected_style())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[2], &mut self.list_state);

        let help = if self.can_submit() {
            "Tab: switch field | ↑/↓: choose realm | Enter: Begin Your Adventure | Esc: quit"
        } else {
            "Enter a name to begin | Tab: switch field | Esc: quit"
        };
        frame.render_widget(
            Paragraph::new(help).style(self.theme.hint_style()),
            chunks[3],
        );
    }
}
