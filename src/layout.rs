//! Word wrapping and row budgeting for the events region.

use crate::history::HistoricalEvent;
use crate::select::MAX_EVENTS;

const ELLIPSIS: &str = "...";

/// Space available for events on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBudget {
  /// Rows in the events region, separator rows included
  pub max_rows: usize,
  /// Full line width, label included
  pub line_width: usize,
  /// Columns reserved on each line for the year label
  pub label_width: usize,
}

impl LayoutBudget {
  /// Width left for event text
  pub fn text_width(&self) -> usize {
    self.line_width.saturating_sub(self.label_width)
  }
}

/// An event wrapped and positioned inside the events region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedEvent {
  pub year: i32,
  /// Never empty; the first line sits next to the year label
  pub lines: Vec<String>,
  /// Row offset from the top of the events region
  pub row: usize,
}

impl FittedEvent {
  /// Rows taken, including the blank separator after the event
  pub fn rows(&self) -> usize {
    self.lines.len() + 1
  }
}

/// Total rows used by a fitted layout.
pub fn rows_used(events: &[FittedEvent]) -> usize {
  events.iter().map(FittedEvent::rows).sum()
}

/// Wrap and place events in order until the budget or [`MAX_EVENTS`] runs out.
///
/// The first event that does not fit stops placement; later, shorter events
/// are not considered.
pub fn fit(events: Vec<HistoricalEvent>, budget: &LayoutBudget) -> Vec<FittedEvent> {
  let width = budget.text_width();
  let mut fitted: Vec<FittedEvent> = Vec::new();
  let mut row = 0;

  for event in events {
    if fitted.len() >= MAX_EVENTS {
      break;
    }

    let lines = wrap_text(event.text.trim(), width);
    let cost = lines.len() + 1;
    if row + cost > budget.max_rows {
      break;
    }

    fitted.push(FittedEvent {
      year: event.year,
      lines,
      row,
    });
    row += cost;
  }

  fitted
}

/// Greedy word wrap counted in characters.
///
/// Text that already fits is returned untouched. A word longer than
/// `max_width` gets a line of its own, cut short with `...` when there is
/// room for it.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
  if max_width == 0 || text.chars().count() <= max_width {
    return vec![text.to_string()];
  }

  let mut lines: Vec<String> = Vec::new();
  let mut current = String::new();
  let mut current_len = 0;

  for word in text.split_whitespace() {
    let word_len = word.chars().count();

    if current_len > 0 && current_len + 1 + word_len <= max_width {
      current.push(' ');
      current.push_str(word);
      current_len += 1 + word_len;
      continue;
    }

    if current_len > 0 {
      lines.push(std::mem::take(&mut current));
      current_len = 0;
    }

    if word_len <= max_width {
      current.push_str(word);
      current_len = word_len;
    } else {
      lines.push(truncate_word(word, max_width));
    }
  }

  if current_len > 0 {
    lines.push(current);
  }

  if lines.is_empty() {
    lines.push(String::new());
  }
  lines
}

fn truncate_word(word: &str, max_width: usize) -> String {
  if max_width > ELLIPSIS.len() {
    let kept: String = word.chars().take(max_width - ELLIPSIS.len()).collect();
    kept + ELLIPSIS
  } else {
    word.chars().take(max_width).collect()
  }
}
