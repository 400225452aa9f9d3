//! Text input bar.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let (border_color, text_color) = if app.input.enabled {
        (Color::Cyan, Color::White)
    } else {
        (Color::DarkGray, Color::DarkGray)
    };

    let block = Block::default()
        .title(" Message (Enter to send, Ctrl-C to quit) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = Paragraph::new(app.input.text.as_str())
        .style(Style::default().fg(text_color));
    frame.render_widget(input, inner);

    if app.input.enabled {
        let width = app.input.text.chars().count() as u16;
        frame.set_cursor_position(Position::new(inner.x + width, inner.y));
    }
}
