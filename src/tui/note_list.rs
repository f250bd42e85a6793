use std::collections::HashMap;

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::api::Note;
use crate::controller::{AppState, Event};
use crate::tui::note_card::NoteCard;

pub const EMPTY_STATE: &str = "No notes found.";

/// Search box plus the cards of the filtered notes.
#[derive(Debug, Default)]
pub struct NoteList {
    cursor: usize,
    search_focused: bool,
    cards: HashMap<String, NoteCard>,
}

fn card_key(note: &Note) -> String {
    note.id.clone().unwrap_or_default()
}

impl NoteList {
    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    /// True while the list wants every key: typing a search or an armed
    /// delete prompt.
    pub fn is_capturing(&self) -> bool {
        self.search_focused || self.cards.values().any(NoteCard::is_confirming)
    }

    /// Forget card state for notes no longer shown and keep the cursor in range
    pub fn sync(&mut self, visible: &[&Note]) {
        self.cards
            .retain(|id, _| visible.iter().any(|n| n.id.as_deref() == Some(id.as_str())));
        self.cursor = self.cursor.min(visible.len().saturating_sub(1));
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        visible: &[&Note],
        search_term: &str,
    ) -> Option<Event> {
        if self.search_focused {
            return match key {
                KeyCode::Char(c) => {
                    let mut term = search_term.to_string();
                    term.push(c);
                    self.cursor = 0;
                    Some(Event::SetSearchTerm(term))
                }
                KeyCode::Backspace => {
                    let mut term = search_term.to_string();
                    term.pop();
                    self.cursor = 0;
                    Some(Event::SetSearchTerm(term))
                }
                KeyCode::Enter | KeyCode::Esc => {
                    self.search_focused = false;
                    None
                }
                _ => None,
            };
        }

        let focused = visible.get(self.cursor).copied();

        // an armed prompt swallows navigation too
        if let Some(note) = focused {
            if let Some(card) = self.cards.get_mut(&card_key(note)) {
                if card.is_confirming() {
                    return card.handle_key(key, note);
                }
            }
        }

        match key {
            KeyCode::Char('/') => {
                self.search_focused = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < visible.len() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            _ => {
                let note = focused?;
                self.cards.entry(card_key(note)).or_default().handle_key(key, note)
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let border = if self.search_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let search = if state.search_term.is_empty() && !self.search_focused {
            Paragraph::new("Search notes…").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(state.search_term.as_str())
        };
        frame.render_widget(
            search.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title("Search (/)"),
            ),
            chunks[0],
        );
        if self.search_focused {
            let typed = state.search_term.chars().count() as u16;
            frame.set_cursor_position((chunks[0].x + 1 + typed, chunks[0].y + 1));
        }

        let visible = state.filtered_notes();
        let list_title = if state.search_term.trim().is_empty() {
            "Notes".to_string()
        } else {
            format!("Notes ({} found)", visible.len())
        };
        let block = Block::default().borders(Borders::ALL).title(list_title);

        if visible.is_empty() {
            let empty = Paragraph::new(EMPTY_STATE)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let idle = NoteCard::default();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|note| {
                let card = self.cards.get(&card_key(note)).unwrap_or(&idle);
                card.render(note, state.is_selected(note))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.cursor));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn notes() -> Vec<Note> {
        ["1", "2", "3"]
            .iter()
            .map(|id| Note {
                id: Some(id.to_string()),
                title: format!("Note {id}"),
                content: "body".into(),
                updated_at: Some("2024-01-01T00:00:00Z".into()),
            })
            .collect()
    }

    fn rendered(list: &NoteList, state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| list.render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn cursor_stays_in_range() {
        let notes = notes();
        let visible: Vec<&Note> = notes.iter().collect();
        let mut list = NoteList::default();

        for _ in 0..5 {
            list.handle_key(KeyCode::Char('j'), &visible, "");
        }
        assert_eq!(list.cursor(), 2);

        list.sync(&visible[..1]);
        assert_eq!(list.cursor(), 0);
        list.handle_key(KeyCode::Up, &visible, "");
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn typing_in_search_emits_the_whole_term() {
        let mut list = NoteList::default();
        assert_eq!(list.handle_key(KeyCode::Char('/'), &[], ""), None);
        assert!(list.is_search_focused());
        assert!(list.is_capturing());

        assert_eq!(
            list.handle_key(KeyCode::Char('b'), &[], "a"),
            Some(Event::SetSearchTerm("ab".into()))
        );
        assert_eq!(
            list.handle_key(KeyCode::Backspace, &[], "ab"),
            Some(Event::SetSearchTerm("a".into()))
        );

        list.handle_key(KeyCode::Enter, &[], "a");
        assert!(!list.is_search_focused());
    }

    #[test]
    fn keys_reach_the_card_under_the_cursor() {
        let notes = notes();
        let visible: Vec<&Note> = notes.iter().collect();
        let mut list = NoteList::default();

        list.handle_key(KeyCode::Down, &visible, "");
        assert_eq!(
            list.handle_key(KeyCode::Enter, &visible, ""),
            Some(Event::Select(notes[1].clone()))
        );
    }

    #[test]
    fn armed_card_holds_the_cursor() {
        let notes = notes();
        let visible: Vec<&Note> = notes.iter().collect();
        let mut list = NoteList::default();

        list.handle_key(KeyCode::Char('d'), &visible, "");
        assert!(list.is_capturing());
        list.handle_key(KeyCode::Down, &visible, "");
        assert_eq!(list.cursor(), 0);

        assert_eq!(
            list.handle_key(KeyCode::Char('y'), &visible, ""),
            Some(Event::Delete(notes[0].clone()))
        );
        assert!(!list.is_capturing());
    }

    #[test]
    fn hidden_cards_lose_their_prompt() {
        let notes = notes();
        let visible: Vec<&Note> = notes.iter().collect();
        let mut list = NoteList::default();

        list.handle_key(KeyCode::Char('d'), &visible, "");
        list.sync(&visible[1..]);
        assert!(!list.is_capturing());
    }

    #[test]
    fn renders_empty_state() {
        let list = NoteList::default();
        let state = AppState::default();
        assert!(rendered(&list, &state).contains(EMPTY_STATE));
    }

    #[test]
    fn renders_filtered_cards_only() {
        let list = NoteList::default();
        let state = AppState {
            notes: notes(),
            search_term: "note 2".into(),
            ..AppState::default()
        };
        let screen = rendered(&list, &state);
        assert!(screen.contains("Note 2"));
        assert!(!screen.contains("Note 1"));
        assert!(screen.contains("Notes (1 found)"));
    }

    #[test]
    fn renders_untitled_fallback_and_delete_prompt() {
        let mut list = NoteList::default();
        let mut untitled = notes();
        untitled[0].title.clear();
        let state = AppState {
            notes: untitled,
            ..AppState::default()
        };
        let visible = state.filtered_notes();
        list.handle_key(KeyCode::Char('d'), &visible, "");

        let screen = rendered(&list, &state);
        assert!(screen.contains("Untitled"));
        assert!(screen.contains("Delete this note?"));
    }
}
