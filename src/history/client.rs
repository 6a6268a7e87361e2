//! Feed client with bounded retries, backoff and cache integration.

use color_eyre::{eyre::eyre, Result};
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use super::api_types::parse_events;
use super::error::{is_retryable_status, FetchError};
use super::types::{DateKey, HistoricalEvent};
use crate::cache::{body_digest, CacheLayer, CacheResult, CacheStorage};

pub const DEFAULT_BASE_URL: &str = "https://api.wikimedia.org/feed/v1/wikipedia/en/onthisday/all";

pub const USER_AGENT: &str = concat!(
  "glimpse/",
  env!("CARGO_PKG_VERSION"),
  " (on-this-day terminal viewer)"
);

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(12);

/// How failed requests are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first
  pub max_attempts: u32,
  /// Delay after the first failure; doubles after every retry
  pub initial_backoff: Duration,
  /// Each delay is shifted by a uniform offset in `[-jitter, +jitter)`
  pub jitter: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      initial_backoff: Duration::from_millis(500),
      jitter: Duration::from_millis(100),
    }
  }
}

impl RetryPolicy {
  /// Delay before the next attempt, never negative.
  pub fn delay<R: Rng>(&self, backoff: Duration, rng: &mut R) -> Duration {
    let jitter_ms = self.jitter.as_millis() as i64;
    if jitter_ms == 0 {
      return backoff;
    }
    let offset = rng.gen_range(-jitter_ms..jitter_ms);
    let delay_ms = backoff.as_millis() as i64 + offset;
    Duration::from_millis(delay_ms.max(0) as u64)
  }
}

/// Client for the "on this day" feed.
///
/// Serves fresh cached bodies without touching the network, otherwise
/// fetches with retries and writes the raw body back to the cache.
pub struct FeedClient<S: CacheStorage, R: Rng> {
  http: reqwest::Client,
  base_url: Url,
  cache: CacheLayer<S>,
  retry: RetryPolicy,
  attempt_timeout: Duration,
  rng: R,
}

impl<S: CacheStorage, R: Rng> FeedClient<S, R> {
  pub fn new(base_url: &str, cache: CacheLayer<S>, rng: R) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid feed URL '{}': {}", base_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Feed URL cannot have path segments: {}", base_url));
    }

    let http = reqwest::Client::builder()
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      cache,
      retry: RetryPolicy::default(),
      attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
      rng,
    })
  }

  #[cfg(test)]
  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
    self.attempt_timeout = timeout;
    self
  }

  #[cfg(test)]
  pub fn cache(&self) -> &CacheLayer<S> {
    &self.cache
  }

  /// `<base>/<MM>/<DD>`
  pub fn feed_url(&self, key: DateKey) -> Result<Url, FetchError> {
    let mut url = self.base_url.clone();
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?;
      segments
        .pop_if_empty()
        .push(&key.month_segment())
        .push(&key.day_segment());
    }
    Ok(url)
  }

  /// Fetch the events for `key`.
  ///
  /// 1. Unless `bypass_cache`, serve a fresh cached body if it parses
  /// 2. Otherwise request the feed, retrying transient failures with backoff
  /// 3. Cache the raw body on success (unless `bypass_cache`)
  ///
  /// Passing `deadline` during an attempt or a backoff sleep yields
  /// `FetchError::Cancelled` right away.
  pub async fn fetch_on_this_day(
    &mut self,
    key: DateKey,
    bypass_cache: bool,
    deadline: Instant,
  ) -> Result<CacheResult<Vec<HistoricalEvent>>, FetchError> {
    if !bypass_cache {
      if let Some((body, cached_at)) = self.cache.lookup(key).into_fresh() {
        match parse_events(&body) {
          Ok(events) => {
            debug!(%key, count = events.len(), sha256 = %body_digest(&body), "Serving events from cache");
            return Ok(CacheResult::from_cache(events, cached_at));
          }
          Err(e) => warn!(%key, error = %e, "Cached feed body failed to parse, refetching"),
        }
      }
    }

    let url = self.feed_url(key)?;
    let mut backoff = self.retry.initial_backoff;
    let mut last_error = FetchError::NoAttempts;

    for attempt in 1..=self.retry.max_attempts {
      match self.attempt(&url, deadline).await {
        Ok(body) => {
          let events = parse_events(&body)?;
          info!(%key, attempt, count = events.len(), sha256 = %body_digest(&body), "Fetched events");

          if !bypass_cache {
            self.cache.store(key, &body);
          }
          return Ok(CacheResult::from_network(events));
        }
        Err(e) if e.is_transient() => {
          warn!(%key, attempt, error = %e, "Feed request failed");
          last_error = e;

          if attempt < self.retry.max_attempts {
            let delay = self.retry.delay(backoff, &mut self.rng);
            sleep_or_cancel(delay, deadline).await?;
            backoff *= 2;
          }
        }
        Err(e) => return Err(e),
      }
    }

    Err(last_error)
  }

  /// One request, bounded by the per-attempt timeout and the overall deadline.
  async fn attempt(&self, url: &Url, deadline: Instant) -> Result<Vec<u8>, FetchError> {
    let now = Instant::now();
    if now >= deadline {
      return Err(FetchError::Cancelled);
    }
    let attempt_deadline = deadline.min(now + self.attempt_timeout);

    let request = async {
      let response = self
        .http
        .get(url.clone())
        .header(ACCEPT, "application/json")
        .header(ACCEPT_ENCODING, "identity")
        .send()
        .await
        .map_err(FetchError::Network)?;

      let status = response.status();
      let body = response.bytes().await.map_err(FetchError::Read)?;

      if status.is_success() {
        Ok(body.to_vec())
      } else if is_retryable_status(status) {
        Err(FetchError::Status { status })
      } else {
        Err(FetchError::Rejected {
          status,
          body: String::from_utf8_lossy(&body).into_owned(),
        })
      }
    };

    match tokio::time::timeout_at(attempt_deadline, request).await {
      Ok(result) => result,
      Err(_) if Instant::now() >= deadline => Err(FetchError::Cancelled),
      Err(_) => Err(FetchError::AttemptTimeout(self.attempt_timeout)),
    }
  }
}

async fn sleep_or_cancel(delay: Duration, deadline: Instant) -> Result<(), FetchError> {
  tokio::select! {
    biased;
    _ = tokio::time::sleep_until(deadline) => Err(FetchError::Cancelled),
    _ = tokio::time::sleep(delay) => Ok(()),
  }
}
