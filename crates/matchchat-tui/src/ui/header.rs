//! One-line header: which match, how far the cursor has come.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let spans = vec![
        Span::styled(
            format!(" match #{} ", app.panel.match_id()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!(" last id: {} ", app.panel.cursor()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
