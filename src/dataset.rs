//! One load cycle and its published result.
//!
//! A [`Dataset`] is built in one go (fetch both exports, normalize, run
//! every aggregation pass) and is immutable afterwards. A failed load never
//! yields a partial dataset.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::calculate::{calculate_map_statistics, calculate_player_stats, player_summaries};
use crate::fetch::{FetchError, Fetcher, Source};
use crate::ingest::{parse_matches, parse_tier_table, IngestError};
use crate::models::{
    MapStatistics, MatchRecord, PlayerStats, PlayerStatsTable, PlayerSummary, TierTable,
};

/// Errors that fail a whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to fetch match table from {source_name}: {error}")]
    Matches {
        source_name: String,
        #[source]
        error: FetchError,
    },

    #[error("Failed to fetch tier table from {source_name}: {error}")]
    Tiers {
        source_name: String,
        #[source]
        error: FetchError,
    },

    #[error("Failed to parse match table: {0}")]
    Parse(#[from] IngestError),
}

/// Everything produced by one load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Normalized records, in file order
    pub records: Vec<MatchRecord>,
    pub player_stats: PlayerStatsTable,
    /// Sorted by games played, descending
    pub player_summaries: Vec<PlayerSummary>,
    /// Sorted by games played, descending
    pub map_statistics: Vec<MapStatistics>,
    #[serde(skip)]
    pub tiers: TierTable,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Run every aggregation over already-normalized records.
    pub fn build(records: Vec<MatchRecord>, tiers: TierTable) -> Self {
        let player_stats = calculate_player_stats(&records);
        let player_summaries = player_summaries(&player_stats, &records, &tiers);
        let map_statistics = calculate_map_statistics(&records);

        info!(
            "Aggregated {} records: {} players, {} maps",
            records.len(),
            player_stats.len(),
            map_statistics.len()
        );

        Self {
            records,
            player_stats,
            player_summaries,
            map_statistics,
            tiers,
            loaded_at: Utc::now(),
        }
    }

    /// Fetch both exports and build the dataset.
    pub async fn load(
        fetcher: &Fetcher,
        matches: &Source,
        tiers: &Source,
    ) -> Result<Self, LoadError> {
        info!("Loading match table from {}", matches);

        let tier_text = fetcher
            .fetch_text(tiers)
            .await
            .map_err(|error| LoadError::Tiers {
                source_name: tiers.to_string(),
                error,
            })?;
        let match_text = fetcher
            .fetch_text(matches)
            .await
            .map_err(|error| LoadError::Matches {
                source_name: matches.to_string(),
                error,
            })?;

        let tier_table = parse_tier_table(&tier_text);
        let parsed = parse_matches(&match_text)?;

        Ok(Self::build(parsed.records, tier_table))
    }

    /// Statistics for a player; the id is case-folded before lookup.
    pub fn player(&self, player_id: &str) -> Option<&PlayerStats> {
        self.player_stats.get(&player_id.trim().to_lowercase())
    }

    pub fn map(&self, code: &str) -> Option<&MapStatistics> {
        let code = code.trim().to_lowercase();
        self.map_statistics.iter().find(|m| m.map == code)
    }

    /// Every game between two players, most recent first.
    pub fn matches_between(&self, player_id: &str, opponent_id: &str) -> Vec<&MatchRecord> {
        let player = player_id.trim().to_lowercase();
        let opponent = opponent_id.trim().to_lowercase();
        self.recent_first(|r| {
            (r.first.id == player && r.second.id == opponent)
                || (r.second.id == player && r.first.id == opponent)
        })
    }

    /// Every game a player played on a map, most recent first.
    pub fn matches_on_map(&self, player_id: &str, map: &str) -> Vec<&MatchRecord> {
        let player = player_id.trim().to_lowercase();
        let map = map.trim().to_lowercase();
        self.recent_first(|r| r.map == map && r.involves(&player))
    }

    fn recent_first(&self, keep: impl Fn(&MatchRecord) -> bool) -> Vec<&MatchRecord> {
        let mut found: Vec<&MatchRecord> = self.records.iter().filter(|r| keep(*r)).collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetcherConfig;
    use crate::models::{Competitor, Outcome};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn game(date: &str, map: &str, winner: &str, loser: &str) -> MatchRecord {
        let competitor = |name: &str, won: bool| Competitor {
            id: name.to_lowercase(),
            display_name: name.to_string(),
            race: "T".to_string(),
            result: if won { "1" } else { "" }.to_string(),
            ..Default::default()
        };
        MatchRecord {
            date: date.to_string(),
            map: map.to_string(),
            first: competitor(winner, true),
            second: competitor(loser, false),
            ..Default::default()
        }
    }

    fn sample() -> Dataset {
        Dataset::build(
            vec![
                game("2025-01-01", "dejavu", "Alice", "Bob"),
                game("2025-01-03", "eclipse", "Bob", "Alice"),
                game("2025-01-02", "dejavu", "Alice", "Carol"),
                game("2025-01-04", "dejavu", "Bob", "Alice"),
            ],
            TierTable::new(),
        )
    }

    #[test]
    fn test_build_publishes_all_views() {
        let data = sample();
        assert_eq!(data.records.len(), 4);
        assert_eq!(data.player_stats.len(), 3);
        assert_eq!(data.player_summaries.len(), 3);
        assert_eq!(data.player_summaries[0].player_id, "alice");
        assert_eq!(data.map_statistics[0].map, "dejavu");
    }

    #[test]
    fn test_player_lookup_case_folds() {
        let data = sample();
        assert!(data.player("ALICE").is_some());
        assert!(data.player("dave").is_none());
        assert!(data.map("DejaVu").is_some());
    }

    #[test]
    fn test_matches_between() {
        let data = sample();
        let found = data.matches_between("alice", "Bob");
        let dates: Vec<&str> = found.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-04", "2025-01-03", "2025-01-01"]);
        let outcomes: Vec<Option<Outcome>> =
            found.iter().map(|r| r.outcome_for("alice")).collect();
        assert_eq!(
            outcomes,
            vec![Some(Outcome::Loss), Some(Outcome::Loss), Some(Outcome::Win)]
        );
    }

    #[test]
    fn test_matches_on_map() {
        let data = sample();
        let found = data.matches_on_map("alice", "dejavu");
        let dates: Vec<&str> = found.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-04", "2025-01-02", "2025-01-01"]);
        assert!(data.matches_on_map("carol", "eclipse").is_empty());
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let mut matches = NamedTempFile::new().unwrap();
        write!(
            matches,
            "No,DATE,NAME.COMP,MAP,ID.BATTLENET1,Tier1,RACE1,R.L2,R.R2,ID.BATTLENET2,Tier2,RACE2\n\
             1,2025-01-01,Cup,dejavu,Alice,,T,1,,Bob,2,P\n\
             2,2025-01-02,Cup,dejavu,,,T,1,,Bob,2,P\n"
        )
        .unwrap();
        let mut tiers = NamedTempFile::new().unwrap();
        write!(tiers, "id,tier\nalice,1\n").unwrap();

        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let data = Dataset::load(
            &fetcher,
            &Source::Path(matches.path().to_path_buf()),
            &Source::Path(tiers.path().to_path_buf()),
        )
        .await
        .unwrap();

        assert_eq!(data.records.len(), 1);
        let alice = data.player("alice").unwrap();
        assert_eq!(alice.wins, 1);
        assert_eq!(alice.win_rate, 100.0);
        let summary = data
            .player_summaries
            .iter()
            .find(|s| s.player_id == "alice")
            .unwrap();
        assert_eq!(summary.tier, "1");
        let pvt = data.map("dejavu").unwrap().matchup("PvT").unwrap();
        assert_eq!(pvt.losses, 1);
    }

    #[tokio::test]
    async fn test_load_fails_without_tier_table() {
        let mut matches = NamedTempFile::new().unwrap();
        write!(matches, "No,DATE\n").unwrap();

        let fetcher = Fetcher::with_defaults().unwrap();
        let err = Dataset::load(
            &fetcher,
            &Source::Path(matches.path().to_path_buf()),
            &Source::Path(PathBuf::from("/nonexistent/tier.csv")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LoadError::Tiers { .. }));
    }
}
