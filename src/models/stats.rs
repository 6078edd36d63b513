//! Derived statistics models.
//!
//! Everything here is produced by the aggregator in `crate::calculate` and is
//! read-only afterwards.

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{Category, MatchRecord};
use crate::calculate::calculate_win_rate;

/// Win/loss tally for one slice of a player's games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,

    /// Games in this slice, including ones without a determinable winner
    pub total: u32,

    /// wins / total * 100, 0 when empty
    pub win_rate: f64,
}

impl WinLoss {
    pub fn new(wins: u32, losses: u32, total: u32) -> Self {
        Self {
            wins,
            losses,
            total,
            win_rate: calculate_win_rate(wins, total),
        }
    }
}

/// Per-map breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRecord {
    pub map: String,
    #[serde(flatten)]
    pub record: WinLoss,
}

/// Head-to-head breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentRecord {
    pub opponent_id: String,
    /// Opponent's casing as first seen against this player
    pub opponent_display_name: String,
    #[serde(flatten)]
    pub record: WinLoss,
}

/// Per-tournament breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    pub tournament: String,
    #[serde(flatten)]
    pub record: WinLoss,
}

/// Record against one opposing race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceMatchupRecord {
    pub vs_race: String,
    #[serde(flatten)]
    pub record: WinLoss,
}

/// How often a player picked a race, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceUsage {
    pub race: String,
    pub count: u32,
}

/// Complete statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Case-folded identifier
    pub player_id: String,

    /// First-seen original casing
    pub display_name: String,

    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,

    pub race_usage: Vec<RaceUsage>,

    /// Sorted by games played, descending
    pub map_stats: Vec<MapRecord>,

    /// Sorted by games played, descending
    pub opponent_stats: Vec<OpponentRecord>,

    /// Sorted by games played, descending
    pub tournament_stats: Vec<TournamentRecord>,

    /// Ordered T, P, Z, then anything else
    pub race_matchup_stats: Vec<RaceMatchupRecord>,

    /// Most recent first, at most `RECENT_MATCH_LIMIT`
    pub recent_matches: Vec<MatchRecord>,

    pub league: WinLoss,
    pub pro_league: WinLoss,
    pub solo: WinLoss,
}

impl PlayerStats {
    pub fn category(&self, category: Category) -> &WinLoss {
        match category {
            Category::League => &self.league,
            Category::ProLeague => &self.pro_league,
            Category::Solo => &self.solo,
        }
    }

    /// Most-used race; the first race to reach the top count wins ties.
    pub fn main_race(&self) -> Option<&str> {
        let mut best: Option<&RaceUsage> = None;
        for usage in &self.race_usage {
            if best.map_or(usage.count > 0, |b| usage.count > b.count) {
                best = Some(usage);
            }
        }
        best.map(|u| u.race.as_str())
    }

    pub fn map_record(&self, map: &str) -> Option<&MapRecord> {
        self.map_stats.iter().find(|m| m.map == map)
    }

    pub fn opponent_record(&self, opponent_id: &str) -> Option<&OpponentRecord> {
        self.opponent_stats
            .iter()
            .find(|o| o.opponent_id == opponent_id)
    }

    /// Opponents whose display name contains `query`, ignoring case.
    pub fn search_opponents(&self, query: &str) -> Vec<&OpponentRecord> {
        let query = query.trim().to_lowercase();
        self.opponent_stats
            .iter()
            .filter(|o| {
                query.is_empty() || o.opponent_display_name.to_lowercase().contains(&query)
            })
            .collect()
    }
}

/// Roster row derived from `PlayerStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: String,
    pub display_name: String,
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    /// Empty when the player never had a race recorded
    pub main_race: String,
    /// Tier as of the player's most recent match
    pub tier: String,
}

/// One matchup bucket on one map. `wins` always belong to the
/// lexicographically lower race of the key, `losses` to the higher one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMatchupStats {
    pub matchup: String,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: f64,
}

impl MapMatchupStats {
    pub fn new(matchup: String, wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        Self {
            matchup,
            wins,
            losses,
            total,
            win_rate: calculate_win_rate(wins, total),
        }
    }

    /// Wins of the higher race of the key.
    pub fn higher_race_wins(&self) -> u32 {
        self.losses
    }
}

/// Race matchup breakdown for one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStatistics {
    pub map: String,
    pub total_games: u32,
    pub matchups: Vec<MapMatchupStats>,
}

impl MapStatistics {
    pub fn matchup(&self, key: &str) -> Option<&MapMatchupStats> {
        self.matchups.iter().find(|m| m.matchup == key)
    }
}

/// Player statistics keyed by case-folded identifier, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PlayerStatsTable {
    players: Vec<PlayerStats>,
    index: HashMap<String, usize>,
}

impl PlayerStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a player. A second entry for the same id replaces the first.
    pub fn insert(&mut self, stats: PlayerStats) {
        match self.index.get(&stats.player_id) {
            Some(&i) => self.players[i] = stats,
            None => {
                self.index.insert(stats.player_id.clone(), self.players.len());
                self.players.push(stats);
            }
        }
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerStats> {
        self.index.get(player_id).map(|&i| &self.players[i])
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.index.contains_key(player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStats> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<PlayerStats> for PlayerStatsTable {
    fn from_iter<I: IntoIterator<Item = PlayerStats>>(iter: I) -> Self {
        let mut table = Self::new();
        for stats in iter {
            table.insert(stats);
        }
        table
    }
}

impl Serialize for PlayerStatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.players.len()))?;
        for stats in &self.players {
            map.serialize_entry(&stats.player_id, stats)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, usage: &[(&str, u32)]) -> PlayerStats {
        PlayerStats {
            player_id: id.to_string(),
            display_name: id.to_uppercase(),
            total_games: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            race_usage: usage
                .iter()
                .map(|(race, count)| RaceUsage {
                    race: race.to_string(),
                    count: *count,
                })
                .collect(),
            map_stats: vec![],
            opponent_stats: vec![],
            tournament_stats: vec![],
            race_matchup_stats: vec![],
            recent_matches: vec![],
            league: WinLoss::default(),
            pro_league: WinLoss::default(),
            solo: WinLoss::default(),
        }
    }

    #[test]
    fn test_win_loss_rate() {
        let r = WinLoss::new(3, 1, 5);
        assert_eq!(r.win_rate, 60.0);
        assert_eq!(WinLoss::new(0, 0, 0).win_rate, 0.0);
    }

    #[test]
    fn test_main_race_first_seen_wins_ties() {
        assert_eq!(player("a", &[("T", 3), ("P", 3)]).main_race(), Some("T"));
        assert_eq!(player("a", &[("P", 3), ("T", 3)]).main_race(), Some("P"));
        assert_eq!(player("a", &[("T", 1), ("Z", 4)]).main_race(), Some("Z"));
        assert_eq!(player("a", &[]).main_race(), None);
    }

    #[test]
    fn test_map_matchup_higher_race_wins() {
        let m = MapMatchupStats::new("PvT".to_string(), 3, 1);
        assert_eq!(m.total, 4);
        assert_eq!(m.win_rate, 75.0);
        assert_eq!(m.higher_race_wins(), 1);
    }

    #[test]
    fn test_search_opponents() {
        let mut p = player("a", &[]);
        p.opponent_stats = vec![
            OpponentRecord {
                opponent_id: "flash".to_string(),
                opponent_display_name: "Flash".to_string(),
                record: WinLoss::new(1, 0, 1),
            },
            OpponentRecord {
                opponent_id: "jaedong".to_string(),
                opponent_display_name: "JaeDong".to_string(),
                record: WinLoss::new(0, 1, 1),
            },
        ];
        let found = p.search_opponents("LAS");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].opponent_id, "flash");
        assert_eq!(p.search_opponents("  ").len(), 2);
    }

    #[test]
    fn test_table_keeps_first_seen_order() {
        let table: PlayerStatsTable = vec![player("b", &[]), player("a", &[])]
            .into_iter()
            .collect();
        let ids: Vec<&str> = table.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(table.contains("a"));
        assert!(table.get("c").is_none());
    }

    #[test]
    fn test_table_serializes_as_map() {
        let table: PlayerStatsTable = vec![player("b", &[])].into_iter().collect();
        let json: serde_json::Value = serde_json::to_value(&table).unwrap();
        assert_eq!(json["b"]["playerId"], "b");
        assert_eq!(json["b"]["proLeague"]["total"], 0);
    }

    #[test]
    fn test_breakdown_entry_flattened() {
        let m = MapRecord {
            map: "dejavu".to_string(),
            record: WinLoss::new(1, 1, 2),
        };
        let json: serde_json::Value = serde_json::to_value(&m).unwrap();
        assert_eq!(json["map"], "dejavu");
        assert_eq!(json["winRate"], 50.0);
    }
}
