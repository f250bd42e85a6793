use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::api::{NetworkError, Note, NotesApi};
use crate::controller::state::{AppState, sort_by_recency};

pub const LOAD_FAILED: &str = "Could not load notes";
pub const CREATE_FAILED: &str = "Could not create note";
pub const UPDATE_FAILED: &str = "Could not update note";
pub const DELETE_FAILED: &str = "Could not delete note";

/// User intents emitted by the presentation components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Load,
    RequestCreate,
    RequestEdit(Note),
    CancelEdit,
    /// Carries the edited note; an `id` means update, none means create
    Save(Note),
    Delete(Note),
    Select(Note),
    SetSearchTerm(String),
}

impl Event {
    /// Events that end up writing to the server
    pub fn is_mutating(&self) -> bool {
        matches!(self, Event::Save(_) | Event::Delete(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update,
}

/// Result of a [`Task`], folded back into state by [`NoteController::apply`].
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<Note>, NetworkError>),
    /// On success carries the re-fetched list
    Saved {
        kind: SaveKind,
        result: Result<Vec<Note>, NetworkError>,
    },
    Deleted {
        id: String,
        result: Result<(), NetworkError>,
    },
}

/// Pending API work. Runs off the state, so it may be spawned anywhere.
pub type Task = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

pub struct NoteController {
    api: Arc<dyn NotesApi>,
    state: AppState,
}

impl NoteController {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        NoteController {
            api,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply the synchronous half of `event`. Events that need the server
    /// return a [`Task`] whose [`Outcome`] must be passed to [`apply`](Self::apply).
    pub fn dispatch(&mut self, event: Event) -> Option<Task> {
        match event {
            Event::Load => {
                self.state.loading = true;
                self.state.error = None;
                let api = Arc::clone(&self.api);
                Some(Box::pin(async move { Outcome::Loaded(api.list().await) }))
            }
            Event::RequestCreate => {
                self.state.editing_note = Some(Note::draft());
                self.state.editor_open = true;
                None
            }
            Event::RequestEdit(note) => {
                self.state.editing_note = Some(note);
                self.state.editor_open = true;
                None
            }
            Event::CancelEdit => {
                self.state.editing_note = None;
                self.state.editor_open = false;
                None
            }
            Event::Save(note) => {
                self.state.loading = true;
                Some(self.save_task(note))
            }
            Event::Delete(note) => {
                let Some(id) = note.persisted_id().map(str::to_string) else {
                    tracing::warn!("ignoring delete of a draft note");
                    return None;
                };
                self.state.loading = true;
                let api = Arc::clone(&self.api);
                Some(Box::pin(async move {
                    let result = api.remove(&id).await;
                    Outcome::Deleted { id, result }
                }))
            }
            Event::Select(note) => {
                self.state.selected_id = note.id;
                None
            }
            Event::SetSearchTerm(term) => {
                self.state.search_term = term;
                None
            }
        }
    }

    fn save_task(&self, note: Note) -> Task {
        let api = Arc::clone(&self.api);
        let draft = note.to_draft();
        let id = note.persisted_id().map(str::to_string);
        let kind = if id.is_some() {
            SaveKind::Update
        } else {
            SaveKind::Create
        };
        Box::pin(async move {
            let written = match id.as_deref() {
                Some(id) => api.update(id, &draft).await,
                None => api.create(&draft).await,
            };
            let result = match written {
                Ok(_) => api.list().await,
                Err(e) => Err(e),
            };
            Outcome::Saved { kind, result }
        })
    }

    /// Fold a finished task into state. Outcomes apply unconditionally, even
    /// if the editor or selection changed while the request was in flight.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(result) => {
                match result {
                    Ok(notes) => {
                        tracing::info!(count = notes.len(), "notes loaded");
                        self.replace_notes(notes);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "loading notes failed");
                        self.state.error = Some(LOAD_FAILED.to_string());
                    }
                }
                self.state.loading = false;
            }
            Outcome::Saved { kind, result } => {
                match result {
                    Ok(notes) => {
                        tracing::info!(?kind, "note saved");
                        self.replace_notes(notes);
                        self.state.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(?kind, error = %e, "saving note failed");
                        let message = match kind {
                            SaveKind::Create => CREATE_FAILED,
                            SaveKind::Update => UPDATE_FAILED,
                        };
                        self.state.error = Some(message.to_string());
                    }
                }
                self.state.editing_note = None;
                self.state.editor_open = false;
                self.state.loading = false;
            }
            Outcome::Deleted { id, result } => {
                match result {
                    Ok(()) => {
                        tracing::info!(%id, "note deleted");
                        self.state.notes.retain(|n| n.id.as_deref() != Some(id.as_str()));
                        if self.state.selected_id.as_deref() == Some(id.as_str()) {
                            self.state.selected_id = None;
                        }
                        self.state.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(%id, error = %e, "deleting note failed");
                        self.state.error = Some(DELETE_FAILED.to_string());
                    }
                }
                self.state.loading = false;
            }
        }
    }

    /// Dispatch `event` and, if it produced a task, await it and apply the outcome.
    #[cfg(test)]
    pub async fn run(&mut self, event: Event) {
        if let Some(task) = self.dispatch(event) {
            let outcome = task.await;
            self.apply(outcome);
        }
    }

    fn replace_notes(&mut self, mut notes: Vec<Note>) {
        sort_by_recency(&mut notes);
        self.state.notes = notes;
    }
}
