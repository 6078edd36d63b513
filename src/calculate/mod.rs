//! Statistics calculation engine.
//!
//! Turns the flat list of match records into the published views:
//! - Per-player statistics with map, opponent, tournament, race matchup
//!   and category breakdowns
//! - The roster summary list
//! - Global map x race matchup tables
//!
//! Every function here is a pure pass over an immutable slice of records.
//! Grouping uses [`FirstSeen`] so that ties and "first seen" values do not
//! depend on hash map iteration order.

mod maps;
mod players;
mod summary;

pub use maps::calculate_map_statistics;
pub use players::{calculate_player_stats, RECENT_MATCH_LIMIT};
pub use summary::player_summaries;

use std::collections::HashMap;

use crate::models::{Outcome, WinLoss};

/// Win rate as a percentage of all games played.
pub fn calculate_win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Round a percentage to the one decimal place used for reporting.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mutable win/loss counter used while a pass is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
}

impl Tally {
    /// Count one game. Unknown outcomes only count toward the total.
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Unknown => {}
        }
    }

    pub fn to_win_loss(self) -> WinLoss {
        WinLoss::new(self.wins, self.losses, self.total)
    }
}

/// Keyed accumulator that remembers the order keys were first inserted in.
#[derive(Debug, Clone)]
pub struct FirstSeen<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for FirstSeen<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> FirstSeen<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, created with `init` the first time the key shows up.
    pub fn entry_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((key.to_string(), init()));
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

impl<V: Default> FirstSeen<V> {
    pub fn entry(&mut self, key: &str) -> &mut V {
        self.entry_with(key, V::default)
    }
}
