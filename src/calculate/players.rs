//! Per-player statistics.

use tracing::debug;

use super::{calculate_win_rate, FirstSeen, Tally};
use crate::models::{
    compare_races, Category, MapRecord, MatchRecord, OpponentRecord, Outcome, PlayerStats,
    PlayerStatsTable, RaceMatchupRecord, RaceUsage, Side, TournamentRecord,
};

/// Number of matches kept in a player's recent-match list.
pub const RECENT_MATCH_LIMIT: usize = 20;

struct OpponentTally {
    display_name: String,
    tally: Tally,
}

/// Running state for one player during the pass.
struct PlayerAccumulator<'a> {
    player_id: String,
    display_name: String,
    overall: Tally,
    race_usage: FirstSeen<u32>,
    maps: FirstSeen<Tally>,
    opponents: FirstSeen<OpponentTally>,
    tournaments: FirstSeen<Tally>,
    vs_races: FirstSeen<Tally>,
    league: Tally,
    pro_league: Tally,
    solo: Tally,
    matches: Vec<&'a MatchRecord>,
}

impl<'a> PlayerAccumulator<'a> {
    fn new(player_id: &str, display_name: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            display_name: display_name.to_string(),
            overall: Tally::default(),
            race_usage: FirstSeen::new(),
            maps: FirstSeen::new(),
            opponents: FirstSeen::new(),
            tournaments: FirstSeen::new(),
            vs_races: FirstSeen::new(),
            league: Tally::default(),
            pro_league: Tally::default(),
            solo: Tally::default(),
            matches: Vec::new(),
        }
    }

    /// Fold one record in, seen from `side`.
    fn observe(&mut self, record: &'a MatchRecord, side: Side, outcome: Outcome) {
        let me = record.competitor(side);
        let opponent = record.competitor(side.opposite());

        self.overall.record(outcome);

        if !me.race.is_empty() {
            *self.race_usage.entry(&me.race) += 1;
        }

        if !record.map.is_empty() {
            self.maps.entry(&record.map).record(outcome);
        }

        if !opponent.id.is_empty() {
            self.opponents
                .entry_with(&opponent.id, || OpponentTally {
                    display_name: opponent.display_name.clone(),
                    tally: Tally::default(),
                })
                .tally
                .record(outcome);
        }

        if !record.tournament.is_empty() {
            self.tournaments.entry(&record.tournament).record(outcome);
        }

        if !opponent.race.is_empty() {
            self.vs_races.entry(&opponent.race).record(outcome);
        }

        match Category::from_remark(&record.category) {
            Some(Category::League) => self.league.record(outcome),
            Some(Category::ProLeague) => self.pro_league.record(outcome),
            Some(Category::Solo) => self.solo.record(outcome),
            None => {}
        }

        // Both slots of one row still make a single recent-match entry.
        if !self.matches.last().is_some_and(|last| std::ptr::eq(*last, record)) {
            self.matches.push(record);
        }
    }

    fn finish(self) -> PlayerStats {
        let mut map_stats: Vec<MapRecord> = self
            .maps
            .into_entries()
            .into_iter()
            .map(|(map, tally)| MapRecord {
                map,
                record: tally.to_win_loss(),
            })
            .collect();
        map_stats.sort_by(|a, b| b.record.total.cmp(&a.record.total));

        let mut opponent_stats: Vec<OpponentRecord> = self
            .opponents
            .into_entries()
            .into_iter()
            .map(|(opponent_id, o)| OpponentRecord {
                opponent_id,
                opponent_display_name: o.display_name,
                record: o.tally.to_win_loss(),
            })
            .collect();
        opponent_stats.sort_by(|a, b| b.record.total.cmp(&a.record.total));

        let mut tournament_stats: Vec<TournamentRecord> = self
            .tournaments
            .into_entries()
            .into_iter()
            .map(|(tournament, tally)| TournamentRecord {
                tournament,
                record: tally.to_win_loss(),
            })
            .collect();
        tournament_stats.sort_by(|a, b| b.record.total.cmp(&a.record.total));

        let mut race_matchup_stats: Vec<RaceMatchupRecord> = self
            .vs_races
            .into_entries()
            .into_iter()
            .map(|(vs_race, tally)| RaceMatchupRecord {
                vs_race,
                record: tally.to_win_loss(),
            })
            .collect();
        race_matchup_stats.sort_by(|a, b| compare_races(&a.vs_race, &b.vs_race));

        let mut recent = self.matches;
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let recent_matches = recent
            .into_iter()
            .take(RECENT_MATCH_LIMIT)
            .cloned()
            .collect();

        PlayerStats {
            player_id: self.player_id,
            display_name: self.display_name,
            total_games: self.overall.total,
            wins: self.overall.wins,
            losses: self.overall.losses,
            win_rate: calculate_win_rate(self.overall.wins, self.overall.total),
            race_usage: self
                .race_usage
                .into_entries()
                .into_iter()
                .map(|(race, count)| RaceUsage { race, count })
                .collect(),
            map_stats,
            opponent_stats,
            tournament_stats,
            race_matchup_stats,
            recent_matches,
            league: self.league.to_win_loss(),
            pro_league: self.pro_league.to_win_loss(),
            solo: self.solo.to_win_loss(),
        }
    }
}

/// Build statistics for every player appearing in `records`.
///
/// Players are keyed by case-folded id and listed in the order they first
/// appear (first slot before second slot within a row). The display name is
/// the casing of that first appearance.
pub fn calculate_player_stats(records: &[MatchRecord]) -> PlayerStatsTable {
    let mut players: FirstSeen<PlayerAccumulator<'_>> = FirstSeen::new();

    for record in records {
        let winner = record.winner();
        for side in [Side::First, Side::Second] {
            let me = record.competitor(side);
            if me.id.is_empty() {
                continue;
            }
            players
                .entry_with(&me.id, || PlayerAccumulator::new(&me.id, &me.display_name))
                .observe(record, side, winner.outcome_for(side));
        }
    }

    debug!(
        "Aggregated {} records into {} players",
        records.len(),
        players.len()
    );

    players
        .into_entries()
        .into_iter()
        .map(|(_, acc)| acc.finish())
        .collect()
}
