use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::api::NotesApi;
use crate::controller::{AppState, Event, NoteController, Outcome};
use crate::tui::add_button::AddButton;
use crate::tui::note_editor::NoteEditor;
use crate::tui::note_list::NoteList;

pub enum AppMode {
    Browse,
    Help,
}

/// Event-loop side of the application: routes keys to components, turns
/// their intents into controller events and spawns the resulting tasks.
pub struct App {
    controller: NoteController,
    list: NoteList,
    editor: NoteEditor,
    add_button: AddButton,
    mode: AppMode,
    runtime: Handle,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn NotesApi>, runtime: Handle) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        App {
            controller: NoteController::new(api),
            list: NoteList::default(),
            editor: NoteEditor::default(),
            add_button: AddButton,
            mode: AppMode::Browse,
            runtime,
            outcomes_tx,
            outcomes_rx,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    /// Send `event` to the controller. A write is refused while another
    /// request is still outstanding.
    pub fn dispatch(&mut self, event: Event) {
        if event.is_mutating() && self.state().loading {
            tracing::debug!(?event, "request in flight, ignoring");
            return;
        }
        tracing::trace!(?event, "dispatch");
        if let Some(task) = self.controller.dispatch(event) {
            let tx = self.outcomes_tx.clone();
            self.runtime.spawn(async move {
                // the receiver only goes away with the app itself
                let _ = tx.send(task.await);
            });
        }
        self.sync_views();
    }

    /// Apply every outcome that has arrived since the last call.
    /// Returns whether state changed.
    pub fn drain_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.controller.apply(outcome);
            changed = true;
        }
        if changed {
            self.sync_views();
        }
        changed
    }

    fn sync_views(&mut self) {
        let state = self.controller.state();
        self.editor.bind(state.editing_note.as_ref());
        self.list.sync(&state.filtered_notes());
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let AppMode::Help = self.mode {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.mode = AppMode::Browse;
            }
            return;
        }

        if self.state().editor_open {
            if let Some(event) = self.editor.handle_key(key, modifiers) {
                self.dispatch(event);
            }
            return;
        }

        // the list is hidden while a request is outstanding; only keys that
        // never touch the server stay live
        if self.state().loading {
            match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') => self.mode = AppMode::Help,
                _ => {
                    if let Some(event) = self.add_button.handle_key(key) {
                        self.dispatch(event);
                    }
                }
            }
            return;
        }

        if !self.list.is_capturing() {
            match key {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Esc => {
                    if self.state().search_term.is_empty() {
                        self.should_quit = true;
                    } else {
                        self.dispatch(Event::SetSearchTerm(String::new()));
                    }
                    return;
                }
                KeyCode::Char('?') => {
                    self.mode = AppMode::Help;
                    return;
                }
                KeyCode::Char('r') => {
                    self.dispatch(Event::Load);
                    return;
                }
                _ => {
                    if let Some(event) = self.add_button.handle_key(key) {
                        self.dispatch(event);
                        return;
                    }
                }
            }
        }

        let state = self.controller.state();
        let visible = state.filtered_notes();
        let event = self.list.handle_key(key, &visible, &state.search_term);
        if let Some(event) = event {
            self.dispatch(event);
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        match self.mode {
            AppMode::Browse => self.render_browse(frame),
            AppMode::Help => self.render_help(frame),
        }
    }

    fn render_browse(&self, frame: &mut Frame) {
        let state = self.state();
        let banner_height = if state.error.is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(banner_height),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Notes")
            .block(Block::default().borders(Borders::ALL).title("noteboard"))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(title, chunks[0]);

        if let Some(ref error) = state.error {
            let banner = Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .style(Style::default().fg(Color::Red));
            frame.render_widget(banner, chunks[1]);
        }

        if state.loading {
            let loading = Paragraph::new("Loading…")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[2]);
        } else {
            self.list.render(frame, chunks[2], state);
        }

        let footer = Block::default().borders(Borders::ALL).title("Help");
        let footer_inner = footer.inner(chunks[3]);
        frame.render_widget(footer, chunks[3]);
        let footer_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(18)])
            .split(footer_inner);
        let hints = Paragraph::new(self.footer_hints()).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hints, footer_chunks[0]);
        self.add_button.render(frame, footer_chunks[1]);

        if state.editor_open {
            self.editor.render(frame, frame.area());
        }
    }

    fn footer_hints(&self) -> &'static str {
        if self.list.is_search_focused() {
            "type to search | Enter/Esc: done"
        } else if self.list.is_capturing() {
            "y: delete | n/Esc: keep"
        } else {
            "j/k: move | Enter: select | e: edit | d: delete | /: search | r: refresh | ?: help | q: quit"
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let title = Paragraph::new("Notes")
            .block(Block::default().borders(Borders::ALL).title("noteboard"))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(title, chunks[0]);

        let help_text = r#"Keyboard Shortcuts

LIST:
  j / ↓          Move down
  k / ↑          Move up
  Enter / Space  Select note
  e              Edit note
  d              Delete note (asks first)
  n              New note
  /              Search title and content
  r              Reload notes from the server
  ?              Show this help
  Esc            Clear search, or quit
  q              Quit

DELETE PROMPT:
  y / Enter      Delete
  n / Esc        Keep

EDITOR:
  Tab            Switch between title and content
  Enter          Next line (content) / next field (title)
  Ctrl+S         Save (content must not be blank)
  Esc            Cancel
"#;
        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Keyboard Shortcuts"))
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::White));
        frame.render_widget(help, chunks[1]);

        let back = Paragraph::new("Esc: back")
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(back, chunks[2]);
    }
}
