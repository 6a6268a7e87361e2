//! Serde-deserializable types matching the "on this day" feed payload.
//!
//! The feed also carries `births`, `deaths`, `holidays` and `selected`
//! arrays; only `events` is read, everything else is skipped by serde.

use serde::Deserialize;

use super::types::HistoricalEvent;

#[derive(Debug, Deserialize, Default)]
pub struct ApiOnThisDayResponse {
  #[serde(default)]
  pub events: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ApiEvent {
  #[serde(default)]
  pub year: i32,
  #[serde(default)]
  pub text: String,
}

impl From<ApiEvent> for HistoricalEvent {
  fn from(event: ApiEvent) -> Self {
    HistoricalEvent::new(event.year, event.text)
  }
}

/// Parse a raw feed body into domain events.
///
/// Used for both live responses and cached bodies so the two can never
/// disagree. Malformed JSON is an error, never a partial list.
pub fn parse_events(body: &[u8]) -> serde_json::Result<Vec<HistoricalEvent>> {
  let response: ApiOnThisDayResponse = serde_json::from_slice(body)?;
  Ok(response.events.into_iter().map(HistoricalEvent::from).collect())
}
