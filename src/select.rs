//! Selection strategies reducing a day's events to a handful for display.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;

use crate::history::HistoricalEvent;

/// Most events shown at once.
pub const MAX_EVENTS: usize = 5;

/// How events are picked from the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Strategy {
  /// One event per historical era, topped up at random
  #[default]
  EraBased,
  Random,
  OldestFirst,
}

impl Strategy {
  pub fn name(&self) -> &'static str {
    match self {
      Strategy::EraBased => "era-based",
      Strategy::Random => "random",
      Strategy::OldestFirst => "oldest-first",
    }
  }
}

/// Unrecognized names fall back to era-based.
impl From<&str> for Strategy {
  fn from(name: &str) -> Self {
    match name.trim().to_lowercase().as_str() {
      "random" => Strategy::Random,
      "oldest-first" => Strategy::OldestFirst,
      _ => Strategy::EraBased,
    }
  }
}

impl From<String> for Strategy {
  fn from(name: String) -> Self {
    Strategy::from(name.as_str())
  }
}

/// A named, inclusive year range with a selection quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
  pub name: &'static str,
  pub min_year: i32,
  pub max_year: i32,
  pub quota: usize,
}

impl Era {
  pub fn contains(&self, year: i32) -> bool {
    (self.min_year..=self.max_year).contains(&year)
  }
}

/// Contiguous and disjoint from year 1 to 2030.
pub const ERAS: [Era; 5] = [
  Era {
    name: "Ancient",
    min_year: 1,
    max_year: 500,
    quota: 1,
  },
  Era {
    name: "Medieval",
    min_year: 501,
    max_year: 1500,
    quota: 1,
  },
  Era {
    name: "Early Modern",
    min_year: 1501,
    max_year: 1800,
    quota: 1,
  },
  Era {
    name: "Modern",
    min_year: 1801,
    max_year: 1950,
    quota: 1,
  },
  Era {
    name: "Contemporary",
    min_year: 1951,
    max_year: 2030,
    quota: 1,
  },
];

pub fn era_for(year: i32) -> Option<&'static Era> {
  ERAS.iter().find(|era| era.contains(year))
}

/// Picks events using an explicitly owned randomness source.
pub struct Selector<R: Rng> {
  rng: R,
}

impl<R: Rng> Selector<R> {
  pub fn new(rng: R) -> Self {
    Self { rng }
  }

  /// Reduce `events` to at most [`MAX_EVENTS`].
  ///
  /// With `shuffle` set, oldest-first turns into random selection, and the
  /// chosen events are shuffled again for display.
  pub fn select(
    &mut self,
    mut events: Vec<HistoricalEvent>,
    strategy: Strategy,
    shuffle: bool,
  ) -> Vec<HistoricalEvent> {
    let strategy = match strategy {
      Strategy::OldestFirst if shuffle => Strategy::Random,
      other => other,
    };

    let mut selected = match strategy {
      Strategy::EraBased => self.select_by_era(&events),
      Strategy::Random => {
        events.shuffle(&mut self.rng);
        events.truncate(MAX_EVENTS);
        events
      }
      Strategy::OldestFirst => {
        events.sort_by_key(|e| e.year);
        events.truncate(MAX_EVENTS);
        events
      }
    };

    if shuffle {
      selected.shuffle(&mut self.rng);
    }
    selected
  }

  /// Up to one random event per era, then random events from the rest,
  /// never repeating a (year, text) pair. Sorted by year.
  fn select_by_era(&mut self, events: &[HistoricalEvent]) -> Vec<HistoricalEvent> {
    let mut picked: Vec<usize> = Vec::with_capacity(MAX_EVENTS);
    let mut seen: HashSet<&HistoricalEvent> = HashSet::new();

    'eras: for era in &ERAS {
      let mut eligible: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| era.contains(e.year))
        .map(|(i, _)| i)
        .collect();
      eligible.shuffle(&mut self.rng);

      for &i in eligible.iter().take(era.quota) {
        if seen.insert(&events[i]) {
          picked.push(i);
        }
        if picked.len() >= MAX_EVENTS {
          break 'eras;
        }
      }
    }

    if picked.len() < MAX_EVENTS {
      let mut remaining: Vec<usize> = (0..events.len())
        .filter(|&i| !seen.contains(&events[i]))
        .collect();
      remaining.shuffle(&mut self.rng);

      for i in remaining {
        if picked.len() >= MAX_EVENTS {
          break;
        }
        if seen.insert(&events[i]) {
          picked.push(i);
        }
      }
    }

    let mut selected: Vec<HistoricalEvent> = picked.into_iter().map(|i| events[i].clone()).collect();
    selected.sort_by_key(|e| e.year);
    selected
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn ev(year: i32, text: &str) -> HistoricalEvent {
    HistoricalEvent::new(year, text)
  }

  fn selector(seed: u64) -> Selector<StdRng> {
    Selector::new(StdRng::seed_from_u64(seed))
  }

  /// Two events per era plus a few outside every era
  fn every_era() -> Vec<HistoricalEvent> {
    vec![
      ev(2001, "Contemporary A"),
      ev(79, "Ancient A"),
      ev(1969, "Contemporary B"),
      ev(1215, "Medieval A"),
      ev(1776, "Early modern A"),
      ev(-44, "Before the eras"),
      ev(410, "Ancient B"),
      ev(1066, "Medieval B"),
      ev(1815, "Modern A"),
      ev(1588, "Early modern B"),
      ev(1914, "Modern B"),
      ev(0, "Year zero"),
    ]
  }

  fn numbered(count: i32) -> Vec<HistoricalEvent> {
    (0..count)
      .map(|i| ev(1900 + i * 3, &format!("Event {}", i)))
      .rev()
      .collect()
  }

  fn is_sorted_by_year(events: &[HistoricalEvent]) -> bool {
    events.windows(2).all(|w| w[0].year <= w[1].year)
  }

  #[test]
  fn test_strategy_from_name() {
    assert_eq!(Strategy::from("era-based"), Strategy::EraBased);
    assert_eq!(Strategy::from("random"), Strategy::Random);
    assert_eq!(Strategy::from("Oldest-First"), Strategy::OldestFirst);
    assert_eq!(Strategy::from("source-balanced"), Strategy::EraBased);
    assert_eq!(Strategy::from(""), Strategy::EraBased);
    assert_eq!(Strategy::OldestFirst.name(), "oldest-first");
  }

  #[test]
  fn test_eras_are_contiguous() {
    assert_eq!(ERAS[0].min_year, 1);
    assert_eq!(ERAS[ERAS.len() - 1].max_year, 2030);
    for pair in ERAS.windows(2) {
      assert_eq!(pair[0].max_year + 1, pair[1].min_year);
    }
    assert_eq!(era_for(1969).map(|e| e.name), Some("Contemporary"));
    assert_eq!(era_for(500).map(|e| e.name), Some("Ancient"));
    assert_eq!(era_for(501).map(|e| e.name), Some("Medieval"));
    assert!(era_for(-44).is_none());
    assert!(era_for(2031).is_none());
  }

  #[test]
  fn test_era_based_takes_one_from_each_era() {
    for seed in 0..20 {
      let selected = selector(seed).select(every_era(), Strategy::EraBased, false);

      assert_eq!(selected.len(), MAX_EVENTS);
      assert!(is_sorted_by_year(&selected));
      for era in &ERAS {
        assert_eq!(
          selected.iter().filter(|e| era.contains(e.year)).count(),
          1,
          "era {} with seed {}",
          era.name,
          seed
        );
      }
    }
  }

  #[test]
  fn test_era_based_fills_from_remaining_events() {
    let events = vec![
      ev(1969, "Moon landing"),
      ev(1989, "Berlin Wall falls"),
      ev(2007, "Smartphone launch"),
      ev(1955, "Bus boycott"),
      ev(1815, "Waterloo"),
      ev(-44, "Ides of March"),
      ev(1991, "Web goes public"),
    ];

    for seed in 0..20 {
      let selected = selector(seed).select(events.clone(), Strategy::EraBased, false);

      assert_eq!(selected.len(), MAX_EVENTS);
      assert!(is_sorted_by_year(&selected));
      assert!(selected.contains(&ev(1815, "Waterloo")));
    }
  }

  #[test]
  fn test_era_based_never_repeats_an_event() {
    let events = vec![
      ev(1969, "Moon landing"),
      ev(1969, "Moon landing"),
      ev(1969, "Moon landing"),
      ev(1066, "Hastings"),
      ev(1066, "Hastings"),
      ev(1969, "Woodstock"),
    ];

    for seed in 0..50 {
      let selected = selector(seed).select(events.clone(), Strategy::EraBased, false);

      let unique: HashSet<&HistoricalEvent> = selected.iter().collect();
      assert_eq!(unique.len(), selected.len());
      assert_eq!(selected.len(), 3);
      assert!(is_sorted_by_year(&selected));
    }
  }

  #[test]
  fn test_era_based_with_few_events_returns_all() {
    let events = vec![ev(1969, "Moon landing"), ev(-500, "Before the eras")];
    let selected = selector(3).select(events, Strategy::EraBased, false);
    assert_eq!(
      selected,
      vec![ev(-500, "Before the eras"), ev(1969, "Moon landing")]
    );
  }

  #[test]
  fn test_oldest_first_is_deterministic() {
    let first = selector(1).select(every_era(), Strategy::OldestFirst, false);
    let second = selector(99).select(every_era(), Strategy::OldestFirst, false);

    assert_eq!(first, second);
    assert_eq!(
      first.iter().map(|e| e.year).collect::<Vec<_>>(),
      vec![-44, 0, 79, 410, 1066]
    );
  }

  #[test]
  fn test_oldest_first_keeps_input_order_for_equal_years() {
    let events = vec![ev(1969, "b"), ev(1969, "a"), ev(1900, "c")];
    let selected = selector(0).select(events, Strategy::OldestFirst, false);
    assert_eq!(
      selected,
      vec![ev(1900, "c"), ev(1969, "b"), ev(1969, "a")]
    );
  }

  #[test]
  fn test_oldest_first_with_shuffle_selects_randomly() {
    let events = numbered(20);
    let mut oldest: Vec<HistoricalEvent> = events.clone();
    oldest.sort_by_key(|e| e.year);
    oldest.truncate(MAX_EVENTS);

    let differs = (0..20).any(|seed| {
      let mut selected = selector(seed).select(events.clone(), Strategy::OldestFirst, true);
      assert_eq!(selected.len(), MAX_EVENTS);
      selected.sort_by_key(|e| e.year);
      selected != oldest
    });
    assert!(differs);
  }

  #[test]
  fn test_random_with_shuffle_returns_min_of_five() {
    let five = numbered(5);
    let selected = selector(5).select(five.clone(), Strategy::Random, true);
    assert_eq!(selected.len(), 5);
    for event in &five {
      assert!(selected.contains(event));
    }

    assert_eq!(
      selector(5).select(numbered(3), Strategy::Random, true).len(),
      3
    );
    assert_eq!(
      selector(5).select(numbered(40), Strategy::Random, false).len(),
      5
    );
  }

  #[test]
  fn test_random_draws_from_whole_list() {
    let events = numbered(30);
    let chosen: HashSet<HistoricalEvent> = (0..30)
      .flat_map(|seed| selector(seed).select(events.clone(), Strategy::Random, false))
      .collect();
    assert!(chosen.len() > MAX_EVENTS);
  }

  #[test]
  fn test_shuffle_reorders_era_selection() {
    let reordered = (0..20).any(|seed| {
      let selected = selector(seed).select(every_era(), Strategy::EraBased, true);
      assert_eq!(selected.len(), MAX_EVENTS);
      !is_sorted_by_year(&selected)
    });
    assert!(reordered);
  }

  #[test]
  fn test_empty_input_selects_nothing() {
    for strategy in [Strategy::EraBased, Strategy::Random, Strategy::OldestFirst] {
      for shuffle in [false, true] {
        assert!(selector(0).select(Vec::new(), strategy, shuffle).is_empty());
      }
    }
  }
}
