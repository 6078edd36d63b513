//! Global map x race matchup statistics.

use tracing::debug;

use super::FirstSeen;
use crate::models::{matchup_key, matchup_rank, MapMatchupStats, MapStatistics, MatchRecord};

#[derive(Debug, Default)]
struct MatchupTally {
    /// Wins of the lexicographically lower race
    lower_wins: u32,
    /// Wins of the higher race
    upper_wins: u32,
}

/// Race matchup tables for every map.
///
/// Rows without a map, without either race, or without a determinable winner
/// are skipped. Matchups within a map follow the canonical matchup order with
/// unknown keys last; maps are ordered by games played, descending.
pub fn calculate_map_statistics(records: &[MatchRecord]) -> Vec<MapStatistics> {
    let mut maps: FirstSeen<FirstSeen<MatchupTally>> = FirstSeen::new();
    let mut skipped = 0usize;

    for record in records {
        let winner = match record.winner().side() {
            Some(side) => side,
            None => {
                skipped += 1;
                continue;
            }
        };
        if record.map.is_empty() || record.first.race.is_empty() || record.second.race.is_empty()
        {
            skipped += 1;
            continue;
        }

        let (key, lower) = matchup_key(&record.first.race, &record.second.race);
        let tally = maps.entry(&record.map).entry(&key);
        if record.competitor(winner).race == lower {
            tally.lower_wins += 1;
        } else {
            tally.upper_wins += 1;
        }
    }

    debug!(
        "Map statistics: {} maps, {} records skipped",
        maps.len(),
        skipped
    );

    let mut statistics: Vec<MapStatistics> = maps
        .into_entries()
        .into_iter()
        .map(|(map, matchups)| {
            let mut matchups: Vec<MapMatchupStats> = matchups
                .into_entries()
                .into_iter()
                .map(|(key, t)| MapMatchupStats::new(key, t.lower_wins, t.upper_wins))
                .collect();
            matchups.sort_by_key(|m| matchup_rank(&m.matchup));

            MapStatistics {
                map,
                total_games: matchups.iter().map(|m| m.total).sum(),
                matchups,
            }
        })
        .collect();
    statistics.sort_by(|a, b| b.total_games.cmp(&a.total_games));
    statistics
}
