use chrono::{DateTime, Local};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::rule;
use crate::cache::CacheSource;

/// Draw the "generated on" footer, marking cached data
pub fn draw_footer(frame: &mut Frame, area: Rect, generated_at: DateTime<Local>, source: CacheSource) {
  let width = area.width.min(crate::ui::LINE_WIDTH);

  let mut spans = vec![
    Span::raw(" "),
    Span::styled(">>", Style::default().fg(Color::Black).bg(Color::Red)),
    Span::styled(" Generated on ", Style::default().fg(Color::DarkGray)),
    Span::styled(generated_label(generated_at), Style::default().fg(Color::White)),
  ];
  if source == CacheSource::Cache {
    spans.push(Span::styled(" (cached)", Style::default().fg(Color::Yellow)));
  }

  let paragraph = Paragraph::new(vec![rule(width), Line::from(spans), rule(width)]);

  frame.render_widget(paragraph, area);
}

/// Draw the "press any key" prompt
pub fn draw_prompt(frame: &mut Frame, area: Rect) {
  let line = Line::from(vec![
    Span::raw(" ".repeat(19)),
    Span::styled("<<", Style::default().fg(Color::Yellow)),
    Span::styled("  ...  press ", Style::default().fg(Color::DarkGray)),
    Span::styled("ANY KEY", Style::default().fg(Color::White).bold()),
    Span::styled(" to ", Style::default().fg(Color::DarkGray)),
    Span::styled("CONTINUE", Style::default().fg(Color::White).bold()),
    Span::styled("  ...  ", Style::default().fg(Color::DarkGray)),
    Span::styled(">>", Style::default().fg(Color::Yellow)),
  ]);

  frame.render_widget(Paragraph::new(line), area);
}

/// "July 20, 2025 at 4:05 PM"
pub fn generated_label(at: DateTime<Local>) -> String {
  at.format("%B %-d, %Y at %-I:%M %p").to_string()
}
