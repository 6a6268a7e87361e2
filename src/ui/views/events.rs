use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::layout::FittedEvent;
use crate::ui::renderfns::era_color;
use crate::ui::LABEL_WIDTH;

/// Draw fitted events, each starting at its assigned row
pub fn draw_events(frame: &mut Frame, area: Rect, events: &[FittedEvent]) {
  for event in events {
    for (i, text) in event.lines.iter().enumerate() {
      let y = area.y as usize + event.row + i;
      if y >= area.bottom() as usize {
        return;
      }

      let line = if i == 0 {
        year_line(event.year, text)
      } else {
        Line::from(vec![
          Span::raw(" ".repeat(LABEL_WIDTH as usize)),
          Span::styled(text.clone(), Style::default().fg(Color::White)),
        ])
      };

      let row = Rect::new(area.x, y as u16, area.width, 1);
      frame.render_widget(Paragraph::new(line), row);
    }
  }
}

fn year_line(year: i32, text: &str) -> Line<'static> {
  Line::from(vec![
    Span::raw(" "),
    Span::styled(format!("{:>4}", year), Style::default().fg(era_color(year)).bold()),
    Span::styled(" <", Style::default().fg(Color::DarkGray)),
    Span::styled(":", Style::default().fg(Color::Red)),
    Span::styled("> ", Style::default().fg(Color::DarkGray)),
    Span::styled(text.to_string(), Style::default().fg(Color::White)),
  ])
}
