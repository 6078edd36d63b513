//! Roster listing: search, tier filter and sorting over player summaries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::PlayerSummary;

/// Columns the roster can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    PlayerId,
    Tier,
    MainRace,
    #[default]
    TotalGames,
    Wins,
    Losses,
    WinRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A value pulled out of a summary for comparison.
enum SortKey<'a> {
    Text(&'a str),
    Count(u32),
    Rate(f64),
}

impl SortField {
    fn key<'a>(&self, s: &'a PlayerSummary) -> SortKey<'a> {
        match self {
            SortField::PlayerId => SortKey::Text(&s.player_id),
            SortField::Tier => SortKey::Text(&s.tier),
            SortField::MainRace => SortKey::Text(&s.main_race),
            SortField::TotalGames => SortKey::Count(s.total_games),
            SortField::Wins => SortKey::Count(s.wins),
            SortField::Losses => SortKey::Count(s.losses),
            SortField::WinRate => SortKey::Rate(s.win_rate),
        }
    }

    /// Compare two summaries on this field in `order`.
    ///
    /// Text compares case-insensitively and empty text sorts last in either
    /// direction. Equal keys compare equal so a stable sort keeps the
    /// incoming order.
    pub fn compare(&self, a: &PlayerSummary, b: &PlayerSummary, order: SortOrder) -> Ordering {
        let directed = |ord: Ordering| match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };

        match (self.key(a), self.key(b)) {
            (SortKey::Text(x), SortKey::Text(y)) => match (x.is_empty(), y.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => directed(x.to_lowercase().cmp(&y.to_lowercase())),
            },
            (SortKey::Count(x), SortKey::Count(y)) => directed(x.cmp(&y)),
            (SortKey::Rate(x), SortKey::Rate(y)) => directed(x.total_cmp(&y)),
            _ => Ordering::Equal,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "playerid" | "player" | "id" => Ok(SortField::PlayerId),
            "tier" => Ok(SortField::Tier),
            "mainrace" | "race" => Ok(SortField::MainRace),
            "totalgames" | "games" => Ok(SortField::TotalGames),
            "wins" => Ok(SortField::Wins),
            "losses" => Ok(SortField::Losses),
            "winrate" | "rate" => Ok(SortField::WinRate),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::PlayerId => "playerId",
            SortField::Tier => "tier",
            SortField::MainRace => "mainRace",
            SortField::TotalGames => "totalGames",
            SortField::Wins => "wins",
            SortField::Losses => "losses",
            SortField::WinRate => "winRate",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Roster query parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RosterQuery {
    /// Case-insensitive substring of the display name
    pub search: Option<String>,

    /// Exact tier label; `None` keeps every tier
    pub tier: Option<String>,

    #[serde(default)]
    pub sort: SortField,

    #[serde(default)]
    pub order: SortOrder,
}

impl RosterQuery {
    fn matches(&self, s: &PlayerSummary) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => s
                .display_name
                .to_lowercase()
                .contains(&q.to_lowercase()),
            _ => true,
        };
        let tier_ok = match self.tier.as_deref() {
            Some(t) => s.tier == t,
            None => true,
        };
        search_ok && tier_ok
    }

    /// Filter and sort `summaries`.
    pub fn apply<'a>(&self, summaries: &'a [PlayerSummary]) -> Vec<&'a PlayerSummary> {
        let mut rows: Vec<&PlayerSummary> = summaries.iter().filter(|s| self.matches(s)).collect();
        rows.sort_by(|a, b| self.sort.compare(a, b, self.order));
        rows
    }
}

/// Distinct tier labels present in the roster, in first-seen order.
pub fn tiers_present(summaries: &[PlayerSummary]) -> Vec<&str> {
    let mut tiers: Vec<&str> = Vec::new();
    for s in summaries {
        if !s.tier.is_empty() && !tiers.contains(&s.tier.as_str()) {
            tiers.push(&s.tier);
        }
    }
    tiers
}
