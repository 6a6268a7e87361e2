pub mod api_types;
pub mod client;
pub mod error;
pub mod types;

pub use client::FeedClient;
pub use error::FetchError;
pub use types::{DateKey, HistoricalEvent};
