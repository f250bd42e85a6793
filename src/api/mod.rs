pub mod client;
pub mod errors;
#[cfg(test)]
pub mod memory;
pub mod note;

pub use client::{HttpNotesApi, NotesApi};
pub use errors::NetworkError;
pub use note::{Note, NoteDraft};
