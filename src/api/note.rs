use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned. `None` means the note is a draft that was never saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Note {
    /// An empty draft, as opened by "new note"
    pub fn draft() -> Self {
        Note::default()
    }

    /// The server id, if the note has a usable one. An empty id counts as none.
    pub fn persisted_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_draft(&self) -> bool {
        self.persisted_id().is_none()
    }

    /// Parsed `updated_at`, or `None` if it is missing or not RFC 3339
    pub fn updated_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
        self.updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    /// Case-insensitive substring match against title or content.
    /// `needle_lower` must already be lowercased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }

    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Request body for create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Request body for update. The id is repeated in the body as well as the path.
#[derive(Debug, Serialize)]
pub(crate) struct NoteUpdate<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_note_deserializes_from_server_shape() {
        let note: Note = serde_json::from_str(
            r#"{"id":"7","title":"A","content":"x","updated_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(note.id.as_deref(), Some("7"));
        assert!(!note.is_draft());
        assert!(note.updated_at_parsed().is_some());
    }

    #[test]
    fn empty_id_is_still_a_draft() {
        let note = Note {
            id: Some(String::new()),
            ..Note::draft()
        };
        assert_eq!(note.persisted_id(), None);
        assert!(note.is_draft());
    }

    #[test]
    fn draft_serializes_without_server_fields() {
        let json = serde_json::to_value(Note::draft()).unwrap();
        assert_eq!(json, serde_json::json!({"title": "", "content": ""}));
    }

    #[test]
    fn matches_title_or_content_ignoring_case() {
        let note = Note {
            title: "Groceries".into(),
            content: "Buy MILK".into(),
            ..Note::default()
        };
        assert!(note.matches("grocer"));
        assert!(note.matches("milk"));
        assert!(!note.matches("bread"));
    }

    #[test]
    fn garbage_timestamp_does_not_parse() {
        let note = Note {
            updated_at: Some("yesterday".into()),
            ..Note::default()
        };
        assert!(note.updated_at_parsed().is_none());
    }
}
