use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Draw a short status message, indented like event text
pub fn draw_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
  let lines: Vec<Line> = message
    .lines()
    .map(|l| Line::from(Span::styled(format!(" {}", l), Style::default().fg(color))))
    .collect();

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
  frame.render_widget(paragraph, area);
}
