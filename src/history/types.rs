use color_eyre::{eyre::eyre, Result};
use std::fmt;
use std::str::FromStr;

/// A single "on this day" entry from the feed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoricalEvent {
  /// Negative years are BCE
  pub year: i32,
  pub text: String,
}

impl HistoricalEvent {
  pub fn new(year: i32, text: impl Into<String>) -> Self {
    Self {
      year,
      text: text.into(),
    }
  }
}

/// Calendar day identifying a feed page and its cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateKey {
  month: u32,
  day: u32,
}

impl DateKey {
  pub fn new(month: u32, day: u32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(eyre!("Month out of range: {}", month));
    }
    if !(1..=31).contains(&day) {
      return Err(eyre!("Day out of range: {}", day));
    }
    Ok(Self { month, day })
  }

  pub fn from_date(date: impl chrono::Datelike) -> Self {
    Self {
      month: date.month(),
      day: date.day(),
    }
  }

  pub fn day(&self) -> u32 {
    self.day
  }

  /// Zero-padded month path segment ("07")
  pub fn month_segment(&self) -> String {
    format!("{:02}", self.month)
  }

  /// Zero-padded day path segment ("04")
  pub fn day_segment(&self) -> String {
    format!("{:02}", self.day)
  }

  /// Name of the cache file holding this day's feed body
  pub fn file_name(&self) -> String {
    format!("onthisday_{:02}_{:02}.json", self.month, self.day)
  }

  /// English month name ("July")
  pub fn month_name(&self) -> &'static str {
    u8::try_from(self.month)
      .ok()
      .and_then(|m| chrono::Month::try_from(m).ok())
      .map(|m| m.name())
      .unwrap_or("Unknown")
  }
}

impl fmt::Display for DateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}-{:02}", self.month, self.day)
  }
}

/// Parses `MM-DD` (as given to `--date`)
impl FromStr for DateKey {
  type Err = color_eyre::Report;

  fn from_str(s: &str) -> Result<Self> {
    let (month, day) = s
      .trim()
      .split_once('-')
      .ok_or_else(|| eyre!("Expected a date as MM-DD, got '{}'", s))?;
    let month = month
      .parse()
      .map_err(|e| eyre!("Invalid month in '{}': {}", s, e))?;
    let day = day
      .parse()
      .map_err(|e| eyre!("Invalid day in '{}': {}", s, e))?;
    Self::new(month, day)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_segments_are_zero_padded() {
    let key = DateKey::new(7, 4).unwrap();
    assert_eq!(key.month_segment(), "07");
    assert_eq!(key.day_segment(), "04");
    assert_eq!(key.file_name(), "onthisday_07_04.json");
    assert_eq!(key.to_string(), "07-04");
  }

  #[test]
  fn test_rejects_out_of_range() {
    assert!(DateKey::new(0, 1).is_err());
    assert!(DateKey::new(13, 1).is_err());
    assert!(DateKey::new(1, 0).is_err());
    assert!(DateKey::new(1, 32).is_err());
  }

  #[test]
  fn test_parse_date_flag() {
    let key: DateKey = "07-20".parse().unwrap();
    assert_eq!((key.month_segment(), key.day()), ("07".to_string(), 20));
    assert!("0720".parse::<DateKey>().is_err());
    assert!("xx-20".parse::<DateKey>().is_err());
  }

  #[test]
  fn test_month_name() {
    assert_eq!(DateKey::new(10, 18).unwrap().month_name(), "October");
  }

  #[test]
  fn test_from_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(DateKey::from_date(date), DateKey::new(2, 29).unwrap());
  }
}
