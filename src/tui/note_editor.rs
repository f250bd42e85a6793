use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::api::Note;
use crate::controller::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Content,
}

/// Modal form over a draft or an existing note.
#[derive(Debug, Default)]
pub struct NoteEditor {
    incoming: Option<Note>,
    title: String,
    content: String,
    focus: Field,
}

impl NoteEditor {
    /// Point the editor at `incoming`. The fields are reset from it only when
    /// it differs from the note currently bound, so typing survives redraws.
    pub fn bind(&mut self, incoming: Option<&Note>) {
        if self.incoming.as_ref() == incoming {
            return;
        }
        self.incoming = incoming.cloned();
        self.title = incoming.map(|n| n.title.clone()).unwrap_or_default();
        self.content = incoming.map(|n| n.content.clone()).unwrap_or_default();
        self.focus = Field::Title;
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// `Save` with the bound note's fields and trimmed title/content, or
    /// nothing if the content is blank.
    pub fn submit(&self) -> Option<Event> {
        let content = self.content.trim();
        if content.is_empty() {
            return None;
        }
        let mut note = self.incoming.clone().unwrap_or_default();
        note.title = self.title.trim().to_string();
        note.content = content.to_string();
        Some(Event::Save(note))
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
        match key {
            KeyCode::Esc => return Some(Event::CancelEdit),
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => return self.submit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Title => Field::Content,
                    Field::Content => Field::Title,
                };
            }
            KeyCode::Enter => match self.focus {
                Field::Title => self.focus = Field::Content,
                Field::Content => self.content.push('\n'),
            },
            KeyCode::Char(c) => self.field_mut().push(c),
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            _ => {}
        }
        None
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Content => &mut self.content,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered(area, 70, 70);
        frame.render_widget(Clear, area);

        let heading = match self.incoming.as_ref() {
            Some(note) if !note.is_draft() => "Edit Note",
            _ => "New Note",
        };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(heading)
            .style(Style::default().fg(Color::White));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let focused = Style::default().fg(Color::Yellow);
        let border_for = |field: Field| {
            if self.focus == field {
                focused
            } else {
                Style::default()
            }
        };

        let title = if self.title.is_empty() {
            Paragraph::new("Title").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.title.as_str())
        };
        frame.render_widget(
            title.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_for(Field::Title))
                    .title("Title"),
            ),
            chunks[0],
        );

        let content = if self.content.is_empty() {
            Paragraph::new("Write your note here…").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.content.as_str())
        };
        frame.render_widget(
            content.wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_for(Field::Content))
                    .title("Content"),
            ),
            chunks[1],
        );

        let help = Paragraph::new("Ctrl+S: save | Tab: switch field | Esc: cancel")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);

        let (x, y) = match self.focus {
            Field::Title => (chunks[0].x + 1 + self.title.chars().count() as u16, chunks[0].y + 1),
            Field::Content => {
                let rows = self.content.split('\n').count().saturating_sub(1) as u16;
                let last = self.content.rsplit('\n').next().unwrap_or("");
                (
                    chunks[1].x + 1 + last.chars().count() as u16,
                    chunks[1].y + 1 + rows,
                )
            }
        };
        frame.set_cursor_position((x, y));
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
