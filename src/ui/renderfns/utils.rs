use ratatui::prelude::*;

use crate::select::era_for;

/// English ordinal suffix for a day of the month ("st", "nd", "rd", "th")
pub fn ordinal_suffix(n: u32) -> &'static str {
  if (11..=13).contains(&(n % 100)) {
    return "th";
  }
  match n % 10 {
    1 => "st",
    2 => "nd",
    3 => "rd",
    _ => "th",
  }
}

/// Get the display color for a year label
pub fn era_color(year: i32) -> Color {
  match era_for(year).map(|era| era.name) {
    Some("Ancient") => Color::Magenta,
    Some("Medieval") => Color::Yellow,
    Some("Early Modern") => Color::Green,
    Some("Modern") => Color::LightBlue,
    Some(_) => Color::Cyan,
    None => Color::Red,
  }
}

/// A dashed rule in the header/footer style
pub fn rule(width: u16) -> Line<'static> {
  let width = width as usize;
  let lead = width.min(12);
  let rest = width.saturating_sub(lead + 8);
  Line::from(vec![
    Span::styled(" -", Style::default().fg(Color::DarkGray)),
    Span::styled("-".repeat(lead.saturating_sub(2)), Style::default().fg(Color::Cyan)),
    Span::styled("-".repeat(rest), Style::default().fg(Color::Green)),
    Span::styled(" -- -", Style::default().fg(Color::DarkGray)),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ordinal_suffix_basics() {
    assert_eq!(ordinal_suffix(1), "st");
    assert_eq!(ordinal_suffix(2), "nd");
    assert_eq!(ordinal_suffix(3), "rd");
    assert_eq!(ordinal_suffix(4), "th");
    assert_eq!(ordinal_suffix(21), "st");
    assert_eq!(ordinal_suffix(22), "nd");
    assert_eq!(ordinal_suffix(23), "rd");
    assert_eq!(ordinal_suffix(30), "th");
    assert_eq!(ordinal_suffix(31), "st");
  }

  #[test]
  fn test_ordinal_suffix_teens() {
    assert_eq!(ordinal_suffix(11), "th");
    assert_eq!(ordinal_suffix(12), "th");
    assert_eq!(ordinal_suffix(13), "th");
    assert_eq!(ordinal_suffix(111), "th");
  }

  #[test]
  fn test_era_color() {
    assert_eq!(era_color(1969), Color::Cyan);
    assert_eq!(era_color(1066), Color::Yellow);
    assert_eq!(era_color(-44), Color::Red);
  }

  #[test]
  fn test_rule_fits_width() {
    let line = rule(75);
    assert!(line.width() <= 75 + 3);
  }
}
