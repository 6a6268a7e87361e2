use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by [`FeedClient`](super::client::FeedClient).
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("network error: {0}")]
  Network(#[source] reqwest::Error),

  #[error("failed to read response: {0}")]
  Read(#[source] reqwest::Error),

  #[error("request timed out after {0:?}")]
  AttemptTimeout(Duration),

  /// 429 or 5xx
  #[error("API returned status code: {}", .status.as_u16())]
  Status { status: StatusCode },

  #[error("API returned status code: {}, body: {body}", .status.as_u16())]
  Rejected { status: StatusCode, body: String },

  #[error("failed to parse JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("fetch cancelled: deadline exceeded")]
  Cancelled,

  #[error("invalid feed URL: {0}")]
  InvalidUrl(String),

  #[error("no attempts were made")]
  NoAttempts,
}

impl FetchError {
  /// Whether another attempt may succeed.
  pub fn is_transient(&self) -> bool {
    matches!(
      self,
      FetchError::Network(_)
        | FetchError::Read(_)
        | FetchError::AttemptTimeout(_)
        | FetchError::Status { .. }
    )
  }

  /// HTTP status behind the failure, if any.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      FetchError::Status { status } | FetchError::Rejected { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Statuses worth retrying: rate limiting and server errors.
pub fn is_retryable_status(status: StatusCode) -> bool {
  status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
