//! Animated progress line shown while events are fetched.
//!
//! The indicator task owns the terminal until it is stopped. Stopping clears
//! its line and hands the terminal back, so nothing else can draw over it
//! while it is still running.

use color_eyre::{eyre::eyre, Result};
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Absolute row the progress line is drawn on
pub const PROGRESS_ROW: u16 = 11;

const BAR_WIDTH: usize = 10;

struct Step {
  filled: usize,
  label: &'static str,
  delay: Duration,
}

static STEPS: [Step; 4] = [
  Step {
    filled: 4,
    label: "Fetching historical data",
    delay: Duration::from_millis(300),
  },
  Step {
    filled: 6,
    label: "Processing events",
    delay: Duration::from_millis(400),
  },
  Step {
    filled: 8,
    label: "Applying filters and sorting",
    delay: Duration::from_millis(600),
  },
  Step {
    filled: 10,
    label: "Ready to display",
    delay: Duration::from_millis(300),
  },
];

pub struct ProgressIndicator<B: Backend> {
  stop: oneshot::Sender<()>,
  task: JoinHandle<io::Result<Terminal<B>>>,
}

impl<B: Backend + Send + 'static> ProgressIndicator<B> {
  /// Start cycling through the steps on `terminal`
  pub fn spawn(terminal: Terminal<B>) -> Self {
    let (stop, stopped) = oneshot::channel();
    let task = tokio::spawn(animate(terminal, stopped));
    Self { stop, task }
  }

  /// Stop the animation and wait until the progress line is cleared
  pub async fn finish(self) -> Result<Terminal<B>> {
    // The task may already have ended on a draw error
    let _ = self.stop.send(());

    self
      .task
      .await
      .map_err(|e| eyre!("Progress indicator failed: {}", e))?
      .map_err(|e| eyre!("Failed to draw progress: {}", e))
  }
}

async fn animate<B: Backend>(
  mut terminal: Terminal<B>,
  mut stopped: oneshot::Receiver<()>,
) -> io::Result<Terminal<B>> {
  terminal.clear()?;

  let mut index = 0;
  loop {
    let step = &STEPS[index];
    tokio::select! {
      _ = &mut stopped => break,
      _ = tokio::time::sleep(step.delay) => {
        terminal.draw(|frame| draw_step(frame, step))?;
        index = (index + 1) % STEPS.len();
      }
    }
  }

  terminal.draw(|frame| frame.render_widget(Clear, progress_area(frame.area())))?;
  Ok(terminal)
}

fn progress_area(area: Rect) -> Rect {
  let offset = PROGRESS_ROW.min(area.height.saturating_sub(1));
  Rect::new(area.x, area.y + offset, area.width, area.height.min(1))
}

fn draw_step(frame: &mut Frame, step: &Step) {
  let line = Line::from(vec![
    Span::raw(" "),
    Span::styled("█".repeat(step.filled), Style::default().fg(Color::Cyan)),
    Span::styled(
      "░".repeat(BAR_WIDTH - step.filled),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(" "),
    Span::styled(step.label, Style::default().fg(Color::Green)),
  ]);

  frame.render_widget(Paragraph::new(line), progress_area(frame.area()));
}
