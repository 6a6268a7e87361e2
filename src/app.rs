use crate::cache::{CacheLayer, CacheResult, FileStorage};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::history::{DateKey, FeedClient, FetchError, HistoricalEvent};
use crate::layout;
use crate::select::Selector;
use crate::ui::{self, ProgressIndicator, Screen};
use chrono::{DateTime, Local};
use color_eyre::Result;
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(250);

/// How long the idle notice stays up before exiting
const IDLE_NOTICE: Duration = Duration::from_secs(1);

/// How waiting for the user ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dismissal {
  KeyPressed,
  Idle,
}

/// Raw mode and the alternate screen, undone on drop (panics included)
struct TerminalGuard;

impl TerminalGuard {
  fn enter() -> Result<Self> {
    enable_raw_mode()?;
    // Constructed before the screen switch so a failure there still restores raw mode
    let guard = TerminalGuard;
    stdout().execute(EnterAlternateScreen)?;
    Ok(guard)
  }
}

impl Drop for TerminalGuard {
  fn drop(&mut self) {
    restore_terminal();
  }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() {
  if let Err(e) = disable_raw_mode() {
    warn!(error = %e, "Failed to disable raw mode");
  }
  if let Err(e) = stdout().execute(LeaveAlternateScreen) {
    warn!(error = %e, "Failed to leave alternate screen");
  }
}

/// Whether a key press should close the screen
fn dismisses(key: &KeyEvent) -> bool {
  // Bare modifiers are only reported with keyboard enhancement enabled
  !matches!(key.code, KeyCode::Modifier(_))
}

/// Main application state
pub struct App {
  config: Config,
  date: DateKey,
  client: FeedClient<FileStorage, StdRng>,
  selector: Selector<StdRng>,
}

impl App {
  pub fn new(config: Config, date: DateKey) -> Result<Self> {
    let storage = FileStorage::open(config.cache.dir_or_default());
    debug!(dir = %storage.dir().display(), ttl = ?config.cache.ttl, "Cache opened");
    let cache = CacheLayer::new(storage).with_ttl(config.cache.ttl);
    let client = FeedClient::new(&config.feed.base_url, cache, StdRng::from_entropy())?
      .with_attempt_timeout(config.feed.attempt_timeout);

    Ok(Self {
      config,
      date,
      client,
      selector: Selector::new(StdRng::from_entropy()),
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    self.show(terminal).await
  }

  async fn show(&mut self, terminal: Tui) -> Result<()> {
    let progress = ProgressIndicator::spawn(terminal);

    let started = Instant::now();
    let deadline = started + self.config.feed.fetch_timeout;
    let fetched = self
      .client
      .fetch_on_this_day(self.date, self.config.cache.bypass, deadline)
      .await;
    info!(
      date = %self.date,
      elapsed_ms = started.elapsed().as_millis() as u64,
      ok = fetched.is_ok(),
      "Fetch finished"
    );

    // Nothing may draw until the progress line is gone
    let mut terminal = progress.finish().await?;

    let screen = self.build_screen(fetched, Local::now());
    terminal.draw(|frame| ui::draw(frame, &screen))?;

    if self.wait_for_key().await == Dismissal::Idle {
      info!(timeout = ?self.config.display.idle_timeout, "Idle timeout reached");
      terminal.draw(|frame| ui::draw(frame, &Screen::IdleTimeout))?;
      tokio::time::sleep(IDLE_NOTICE).await;
    }

    Ok(())
  }

  /// Turn a fetch outcome into the screen to show
  pub fn build_screen(
    &mut self,
    fetched: Result<CacheResult<Vec<HistoricalEvent>>, FetchError>,
    now: DateTime<Local>,
  ) -> Screen {
    let date = self.date;

    let result = match fetched {
      Ok(result) => result,
      Err(e) => {
        error!(%date, error = %e, status = ?e.status(), "Failed to fetch events");
        return Screen::FetchFailed {
          date,
          message: e.to_string(),
        };
      }
    };

    if result.data.is_empty() {
      info!(%date, "No events for date");
      return Screen::NoEvents { date };
    }

    let total = result.data.len();
    let selected = self.selector.select(
      result.data,
      self.config.display.strategy,
      self.config.display.shuffle,
    );
    let events = layout::fit(selected, &ui::EVENT_BUDGET);

    info!(
      %date,
      total,
      shown = events.len(),
      rows = layout::rows_used(&events),
      strategy = self.config.display.strategy.name(),
      source = ?result.source,
      cached_at = ?result.cached_at,
      "Events ready"
    );

    Screen::Events {
      date,
      events,
      source: result.source,
      generated_at: now,
    }
  }

  async fn wait_for_key(&self) -> Dismissal {
    let mut events = EventHandler::new(TICK_RATE);
    let started = Instant::now();

    while let Some(event) = events.next().await {
      match event {
        Event::Key(key) if dismisses(&key) => return Dismissal::KeyPressed,
        Event::Key(_) => {}
        Event::Tick if started.elapsed() >= self.config.display.idle_timeout => {
          return Dismissal::Idle
        }
        Event::Tick => {}
      }
    }

    // Input closed
    Dismissal::KeyPressed
  }
}
