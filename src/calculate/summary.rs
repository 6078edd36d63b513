//! Roster summary list.

use std::collections::HashMap;

use crate::models::{MatchRecord, PlayerStatsTable, PlayerSummary, Side, TierTable};

/// Date and tier of a player's most recent match.
struct Latest<'a> {
    date: &'a str,
    tier: &'a str,
}

/// Tier each player carried in their most recent match across all records.
/// Equal dates resolve to the earlier row.
fn latest_tiers(records: &[MatchRecord]) -> HashMap<&str, Latest<'_>> {
    let mut latest: HashMap<&str, Latest<'_>> = HashMap::new();
    for record in records {
        for side in [Side::First, Side::Second] {
            let c = record.competitor(side);
            if c.id.is_empty() {
                continue;
            }
            let newer = latest
                .get(c.id.as_str())
                .map_or(true, |seen| record.date.as_str() > seen.date);
            if newer {
                latest.insert(
                    c.id.as_str(),
                    Latest {
                        date: record.date.as_str(),
                        tier: c.tier.as_str(),
                    },
                );
            }
        }
    }
    latest
}

/// Derive the roster list, sorted by games played descending.
///
/// The tier is read from the player's most recent match; when that match
/// carries no tier the side table is consulted.
pub fn player_summaries(
    stats: &PlayerStatsTable,
    records: &[MatchRecord],
    tiers: &TierTable,
) -> Vec<PlayerSummary> {
    let latest = latest_tiers(records);

    let mut summaries: Vec<PlayerSummary> = stats
        .iter()
        .map(|p| {
            let tier = latest
                .get(p.player_id.as_str())
                .map(|l| l.tier)
                .filter(|t| !t.is_empty())
                .or_else(|| tiers.get(&p.player_id))
                .unwrap_or_default();

            PlayerSummary {
                player_id: p.player_id.clone(),
                display_name: p.display_name.clone(),
                total_games: p.total_games,
                wins: p.wins,
                losses: p.losses,
                win_rate: p.win_rate,
                main_race: p.main_race().unwrap_or_default().to_string(),
                tier: tier.to_string(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total_games.cmp(&a.total_games));
    summaries
}
