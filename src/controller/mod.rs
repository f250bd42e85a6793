pub mod note_controller;
pub mod state;

pub use note_controller::{Event, NoteController, Outcome};
pub use state::AppState;
