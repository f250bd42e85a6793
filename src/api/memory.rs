use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::client::NotesApi;
use crate::api::errors::NetworkError;
use crate::api::note::{Note, NoteDraft};

/// In-memory notes resource for tests. Assigns ids and timestamps the way a
/// server would and records which operations were called.
#[derive(Debug, Default)]
pub struct MemoryNotesApi {
    inner: Mutex<Memory>,
}

#[derive(Debug, Default)]
struct Memory {
    notes: Vec<Note>,
    next_id: u32,
    clock: u32,
    calls: Vec<&'static str>,
    failing: bool,
}

impl Memory {
    fn enter(&mut self, call: &'static str) -> Result<(), NetworkError> {
        self.calls.push(call);
        if self.failing {
            return Err(NetworkError::Status {
                method: call,
                url: "memory://notes".to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    fn tick(&mut self) -> String {
        self.clock += 1;
        format!("2030-01-01T00:00:{:02}Z", self.clock % 60)
    }
}

impl MemoryNotesApi {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        MemoryNotesApi {
            inner: Mutex::new(Memory {
                notes,
                ..Memory::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }
}

#[async_trait]
impl NotesApi for MemoryNotesApi {
    async fn list(&self) -> Result<Vec<Note>, NetworkError> {
        let mut memory = self.inner.lock().unwrap();
        memory.enter("list")?;
        Ok(memory.notes.clone())
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, NetworkError> {
        let mut memory = self.inner.lock().unwrap();
        memory.enter("create")?;
        memory.next_id += 1;
        let note = Note {
            id: Some(format!("m{}", memory.next_id)),
            title: draft.title.clone(),
            content: draft.content.clone(),
            updated_at: Some(memory.tick()),
        };
        memory.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: &str, draft: &NoteDraft) -> Result<Note, NetworkError> {
        let mut memory = self.inner.lock().unwrap();
        memory.enter("update")?;
        let stamp = memory.tick();
        let Some(note) = memory.notes.iter_mut().find(|n| n.id.as_deref() == Some(id)) else {
            return Err(NetworkError::Status {
                method: "update",
                url: format!("memory://notes/{id}"),
                status: 404,
            });
        };
        note.title = draft.title.clone();
        note.content = draft.content.clone();
        note.updated_at = Some(stamp);
        Ok(note.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), NetworkError> {
        let mut memory = self.inner.lock().unwrap();
        memory.enter("remove")?;
        memory.notes.retain(|n| n.id.as_deref() != Some(id));
        Ok(())
    }
}
