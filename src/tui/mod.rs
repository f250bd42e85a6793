pub mod add_button;
pub mod app;
pub mod note_card;
pub mod note_editor;
pub mod note_list;
