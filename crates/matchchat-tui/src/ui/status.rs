//! Status bar — latest notice, or whether a send is in flight.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use matchchat_core::events::NoticeLevel;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref notice) = app.notice {
        let color = match notice.level {
            NoticeLevel::Error => Color::Red,
        };
        Line::from(vec![
            Span::styled(" ! ", Style::default().fg(Color::Black).bg(color)),
            Span::styled(format!(" {} ", notice.text), Style::default().fg(color)),
        ])
    } else if !app.input.enabled {
        Line::from(Span::styled(
            " sending... ",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {} message(s) ", app.messages.len()),
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}
