//! Scrollable message list — theirs on the left, mine on the right.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use matchchat_core::types::Side;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Messages ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.messages.is_empty() {
        let empty = Paragraph::new("No new messages yet.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    // Bottom-up with scroll offset
    let visible_height = inner.height as usize;
    let total = app.messages.len();
    let end = total.saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(visible_height * 2); // overshoot for wrapping

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.messages[start..end] {
        let (fg, alignment) = match msg.side {
            Side::Mine => (Color::Green, Alignment::Right),
            Side::Theirs => (Color::Yellow, Alignment::Left),
        };

        for line in msg.content.lines() {
            lines.push(Line::styled(line.to_string(), Style::default().fg(fg)).alignment(alignment));
        }
        let meta = match msg.sender {
            Some(ref sender) => format!("{} · {}", sender, msg.time),
            None => msg.time.clone(),
        };
        lines.push(
            Line::styled(meta, Style::default().fg(Color::DarkGray).italic()).alignment(alignment),
        );
    }

    // Keep the newest lines in view
    let overflow = lines.len().saturating_sub(visible_height) as u16;
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((overflow, 0));
    frame.render_widget(paragraph, inner);
}
