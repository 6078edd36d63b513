//! Race codes and matchup keys.

use std::cmp::Ordering;

/// Canonical race order used for per-player race matchup tables.
pub const RACE_ORDER: [&str; 3] = ["T", "P", "Z"];

/// Canonical order of map matchup keys; mirrors come after cross-race pairs.
pub const MATCHUP_ORDER: [&str; 6] = ["PvT", "PvZ", "TvZ", "PvP", "TvT", "ZvZ"];

/// Build the order-independent matchup key for two races.
///
/// Returns the key together with the lexicographically lower race, which is
/// the race whose wins the key's counters track.
pub fn matchup_key<'a>(a: &'a str, b: &'a str) -> (String, &'a str) {
    let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
    (format!("{}v{}", lower, upper), lower)
}

/// Priority of a race in `RACE_ORDER`; unknown races sort after all known ones.
pub fn race_rank(race: &str) -> usize {
    rank_in(&RACE_ORDER, race)
}

/// Priority of a matchup key in `MATCHUP_ORDER`; unknown keys sort last.
pub fn matchup_rank(key: &str) -> usize {
    rank_in(&MATCHUP_ORDER, key)
}

/// Compare two race codes by canonical priority only.
pub fn compare_races(a: &str, b: &str) -> Ordering {
    race_rank(a).cmp(&race_rank(b))
}

fn rank_in(order: &[&str], value: &str) -> usize {
    order
        .iter()
        .position(|known| *known == value)
        .unwrap_or(order.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matchup_key_symmetric() {
        assert_eq!(matchup_key("T", "P"), ("PvT".to_string(), "P"));
        assert_eq!(matchup_key("P", "T"), ("PvT".to_string(), "P"));
        assert_eq!(matchup_key("Z", "Z"), ("ZvZ".to_string(), "Z"));
    }

    #[test]
    fn test_race_rank() {
        assert_eq!(race_rank("T"), 0);
        assert_eq!(race_rank("P"), 1);
        assert_eq!(race_rank("Z"), 2);
        assert_eq!(race_rank("R"), 3);
        assert_eq!(compare_races("Z", "T"), Ordering::Greater);
        assert_eq!(compare_races("X", "Y"), Ordering::Equal);
    }

    #[test]
    fn test_matchup_rank_unknown_last() {
        assert_eq!(matchup_rank("PvT"), 0);
        assert_eq!(matchup_rank("ZvZ"), 5);
        assert_eq!(matchup_rank("RvT"), MATCHUP_ORDER.len());
    }
}
