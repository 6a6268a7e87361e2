pub mod progress;
mod renderfns;
mod views;

use chrono::{DateTime, Local};
use ratatui::prelude::*;

use crate::cache::CacheSource;
use crate::history::DateKey;
use crate::layout::{FittedEvent, LayoutBudget};

pub use progress::ProgressIndicator;

/// Rows available for events
pub const CONTENT_ROWS: u16 = 12;
/// Width of a rendered event line, label included
pub const LINE_WIDTH: u16 = 75;
/// Width of the " YYYY <:> " label
pub const LABEL_WIDTH: u16 = 10;

pub const EVENT_BUDGET: LayoutBudget = LayoutBudget {
  max_rows: CONTENT_ROWS as usize,
  line_width: LINE_WIDTH as usize,
  label_width: LABEL_WIDTH as usize,
};

/// What the main screen shows
#[derive(Debug, Clone)]
pub enum Screen {
  Events {
    date: DateKey,
    events: Vec<FittedEvent>,
    source: CacheSource,
    generated_at: DateTime<Local>,
  },
  NoEvents {
    date: DateKey,
  },
  FetchFailed {
    date: DateKey,
    message: String,
  },
  IdleTimeout,
}

struct Regions {
  header: Rect,
  content: Rect,
  footer: Rect,
  prompt: Rect,
}

fn regions(area: Rect) -> Regions {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),            // Top margin
      Constraint::Length(5),            // Header
      Constraint::Length(1),            // Spacer
      Constraint::Length(CONTENT_ROWS), // Events
      Constraint::Length(3),            // Footer
      Constraint::Length(1),            // Spacer
      Constraint::Length(1),            // Prompt
      Constraint::Min(0),
    ])
    .split(area);

  Regions {
    header: chunks[1],
    content: chunks[3],
    footer: chunks[4],
    prompt: chunks[6],
  }
}

/// Main draw function
pub fn draw(frame: &mut Frame, screen: &Screen) {
  let regions = regions(frame.area());

  match screen {
    Screen::Events {
      date,
      events,
      source,
      generated_at,
    } => {
      renderfns::draw_header(frame, regions.header, *date);
      views::draw_events(frame, regions.content, events);
      renderfns::draw_footer(frame, regions.footer, *generated_at, *source);
      renderfns::draw_prompt(frame, regions.prompt);
    }
    Screen::NoEvents { date } => {
      renderfns::draw_header(frame, regions.header, *date);
      views::draw_message(
        frame,
        regions.content,
        "No historical events found for this date.",
        Color::Yellow,
      );
      renderfns::draw_prompt(frame, regions.prompt);
    }
    Screen::FetchFailed { date, message } => {
      renderfns::draw_header(frame, regions.header, *date);
      views::draw_message(
        frame,
        regions.content,
        &format!(
          "Error fetching events: {}\n\nCheck your connection and try again.",
          message
        ),
        Color::Red,
      );
      renderfns::draw_prompt(frame, regions.prompt);
    }
    Screen::IdleTimeout => {
      views::draw_message(
        frame,
        regions.content,
        "You've been idle for too long... exiting!",
        Color::Yellow,
      );
    }
  }
}
