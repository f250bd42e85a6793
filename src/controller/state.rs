use std::cmp::Ordering;

use crate::api::Note;

/// Shared application state. Only [`NoteController`](super::NoteController) writes it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Sorted most recently updated first
    pub notes: Vec<Note>,
    pub search_term: String,
    pub loading: bool,
    pub error: Option<String>,
    pub editing_note: Option<Note>,
    pub editor_open: bool,
    pub selected_id: Option<String>,
}

impl AppState {
    /// Notes matching the search term, in `notes` order.
    /// A blank term matches everything.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        let needle = self.search_term.trim();
        if needle.is_empty() {
            return self.notes.iter().collect();
        }
        let needle = needle.to_lowercase();
        self.notes.iter().filter(|note| note.matches(&needle)).collect()
    }

    pub fn is_selected(&self, note: &Note) -> bool {
        self.selected_id.is_some() && self.selected_id == note.id
    }
}

/// Sort descending by `updated_at`. Notes whose timestamp is missing or
/// unparseable go last, keeping their relative order.
pub fn sort_by_recency(notes: &mut [Note]) {
    notes.sort_by(|a, b| match (a.updated_at_parsed(), b.updated_at_parsed()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
