//! TUI layout compositing — assembles all UI panels.

mod chat;
mod header;
mod input;
mod status;

use ratatui::prelude::*;

use crate::app::App;

/// Render the full TUI layout.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // ┌──────────────────────────────────┐
    // │ Header (match, cursor)           │
    // ├──────────────────────────────────┤
    // │ Messages                         │
    // │                                  │
    // ├──────────────────────────────────┤
    // │ Notice / status                  │
    // ├──────────────────────────────────┤
    // │ Input                            │
    // └──────────────────────────────────┘

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(5),    // messages
            Constraint::Length(1), // status
            Constraint::Length(3), // input
        ])
        .split(area);

    header::draw(frame, app, main_layout[0]);
    chat::draw(frame, app, main_layout[1]);
    status::draw(frame, app, main_layout[2]);
    input::draw(frame, app, main_layout[3]);
}
