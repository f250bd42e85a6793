use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::ListItem;

use crate::api::Note;
use crate::controller::Event;

/// Content longer than this is cut and marked with an ellipsis
pub const PREVIEW_CHARS: usize = 100;

/// One note in the list. The only state it owns is whether the inline
/// delete prompt is armed.
#[derive(Debug, Default)]
pub struct NoteCard {
    confirm_delete: bool,
}

impl NoteCard {
    pub fn is_confirming(&self) -> bool {
        self.confirm_delete
    }

    /// `e` edits, `d` arms the delete prompt, Enter/Space selects.
    /// Edit and delete never also select.
    pub fn handle_key(&mut self, key: KeyCode, note: &Note) -> Option<Event> {
        if self.confirm_delete {
            return match key {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.confirm_delete = false;
                    Some(Event::Delete(note.clone()))
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm_delete = false;
                    None
                }
                _ => None,
            };
        }

        match key {
            KeyCode::Char('e') => Some(Event::RequestEdit(note.clone())),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.confirm_delete = true;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(Event::Select(note.clone())),
            _ => None,
        }
    }

    pub fn render<'a>(&self, note: &'a Note, selected: bool) -> ListItem<'a> {
        let mut lines = Vec::new();

        let marker = if selected {
            Span::styled("● ", Style::default().fg(Color::Cyan))
        } else {
            Span::raw("  ")
        };
        let title = if note.title.is_empty() {
            Span::styled(
                "Untitled",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(
                note.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(vec![marker, title]));

        for line in preview(&note.content).lines() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line.to_string(), Style::default().fg(Color::Gray)),
            ]));
        }

        lines.push(Line::from(Span::styled(
            format!("  {}", format_updated_at(note.updated_at.as_deref())),
            Style::default().fg(Color::DarkGray),
        )));

        if self.confirm_delete {
            lines.push(Line::from(vec![
                Span::styled("  Delete this note? ", Style::default().fg(Color::Red)),
                Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(": Yes  ", Style::default().fg(Color::Red)),
                Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(": Cancel", Style::default().fg(Color::Red)),
            ]));
        }

        lines.push(Line::default());
        ListItem::new(lines)
    }
}

/// First [`PREVIEW_CHARS`] characters of `content`, with "…" if anything was cut
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &content[..cut]),
        None => content.to_string(),
    }
}

/// `updated_at` in local time; unparseable values are shown as-is
pub fn format_updated_at(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note() -> Note {
        Note {
            id: Some("1".into()),
            title: "A".into(),
            content: "x".into(),
            updated_at: Some("2024-01-01T00:00:00Z".into()),
        }
    }

    #[test]
    fn short_content_is_not_truncated() {
        assert_eq!(preview("hello"), "hello");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn long_content_is_cut_at_a_char_boundary() {
        let long = "é".repeat(PREVIEW_CHARS + 5);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn bad_timestamps_are_shown_verbatim() {
        assert_eq!(format_updated_at(Some("sometime")), "sometime");
        assert_eq!(format_updated_at(None), "");
        assert!(!format_updated_at(Some("2024-01-01T00:00:00Z")).is_empty());
    }

    #[test]
    fn select_key_selects() {
        let mut card = NoteCard::default();
        assert_eq!(card.handle_key(KeyCode::Enter, &note()), Some(Event::Select(note())));
    }

    #[test]
    fn edit_key_only_edits() {
        let mut card = NoteCard::default();
        assert_eq!(
            card.handle_key(KeyCode::Char('e'), &note()),
            Some(Event::RequestEdit(note()))
        );
        assert!(!card.is_confirming());
    }

    #[test]
    fn delete_key_arms_prompt_instead_of_deleting() {
        let mut card = NoteCard::default();
        assert_eq!(card.handle_key(KeyCode::Char('d'), &note()), None);
        assert!(card.is_confirming());

        // other keys are swallowed while armed
        assert_eq!(card.handle_key(KeyCode::Char('e'), &note()), None);
        assert!(card.is_confirming());

        assert_eq!(
            card.handle_key(KeyCode::Char('y'), &note()),
            Some(Event::Delete(note()))
        );
        assert!(!card.is_confirming());
    }

    #[test]
    fn cancelling_the_prompt_emits_nothing() {
        let mut card = NoteCard::default();
        card.handle_key(KeyCode::Char('d'), &note());
        assert_eq!(card.handle_key(KeyCode::Esc, &note()), None);
        assert!(!card.is_confirming());
    }
}
