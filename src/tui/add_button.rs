use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controller::Event;

pub const ADD_KEY: char = 'n';

/// The "new note" affordance in the footer.
#[derive(Debug, Default)]
pub struct AddButton;

impl AddButton {
    pub fn handle_key(&self, key: KeyCode) -> Option<Event> {
        (key == KeyCode::Char(ADD_KEY)).then_some(Event::RequestCreate)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let button = Paragraph::new(Line::from(vec![
            Span::styled(" ＋ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::styled(format!(" New note ({ADD_KEY})"), Style::default().fg(Color::Cyan)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(button, area);
    }
}
