use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::{ordinal_suffix, rule};
use crate::history::DateKey;

pub const TITLE: &str = "Glimpse In Time";

/// Draw the title banner and the "on this day" date line
pub fn draw_header(frame: &mut Frame, area: Rect, date: DateKey) {
  let width = area.width.min(crate::ui::LINE_WIDTH);

  let title = Line::from(vec![
    Span::raw(" "),
    Span::styled(
      format!(">> {} v{}  ", TITLE, env!("CARGO_PKG_VERSION")),
      Style::default().fg(Color::White).bg(Color::Green).bold(),
    ),
    Span::styled(">>", Style::default().fg(Color::Green)),
  ]);

  let date_line = Line::from(vec![
    Span::raw(" "),
    Span::styled(">>", Style::default().fg(Color::Black).bg(Color::Red)),
    Span::raw(" On "),
    Span::styled("THIS DAY", Style::default().fg(Color::Yellow).bold()),
    Span::raw(", These "),
    Span::styled("EVENTS", Style::default().fg(Color::Yellow).bold()),
    Span::raw(" Happened... "),
    Span::styled(":: ", Style::default().fg(Color::Red)),
    Span::styled(date_label(date), Style::default().fg(Color::White).bold()),
  ]);

  let paragraph = Paragraph::new(vec![rule(width), title, rule(width), date_line, rule(width)]);

  frame.render_widget(paragraph, area);
}

/// "July 20th"
pub fn date_label(date: DateKey) -> String {
  format!(
    "{} {}{}",
    date.month_name(),
    date.day(),
    ordinal_suffix(date.day())
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_date_label() {
    assert_eq!(date_label(DateKey::new(7, 20).unwrap()), "July 20th");
    assert_eq!(date_label(DateKey::new(10, 1).unwrap()), "October 1st");
    assert_eq!(date_label(DateKey::new(3, 12).unwrap()), "March 12th");
  }
}
