//! # Ladder Stats
//!
//! Aggregates a ladder match table into per-player statistics, a roster
//! summary and map x race matchup tables.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, stats, catalogs)
//! - **ingest**: CSV parsing and row normalization
//! - **fetch**: Reading exports from files or over HTTP
//! - **calculate**: Statistics and derived metrics computation
//! - **dataset**: One load cycle and its published result
//! - **roster**: Filtering and sorting the player summary list
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod dataset;
pub mod fetch;
pub mod ingest;
pub mod models;
pub mod roster;

pub use models::*;

use std::time::Duration;

/// Parse a fetch timeout such as "45s", "2m" or "1h". A bare number is
/// seconds. Returns `None` for malformed input or values that overflow.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit_secs) = match s.char_indices().last()? {
        (i, 'h') => (&s[..i], 3600u64),
        (i, 'm') => (&s[..i], 60),
        (i, 's') => (&s[..i], 1),
        _ => (s, 1),
    };

    let count: u64 = digits.parse().ok()?;
    count.checked_mul(unit_secs).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("45s"), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_parse_duration_bare_number_is_seconds() {
        assert_eq!(parse_duration(" 30 "), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("0"), Some(Duration::ZERO));
    }

    #[test]
    fn test_parse_duration_rejects_malformed() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("ten seconds"), None);
        assert_eq!(parse_duration("-5s"), None);
        assert_eq!(parse_duration("1.5m"), None);
    }

    #[test]
    fn test_parse_duration_overflow_is_none() {
        assert_eq!(parse_duration("99999999999999999h"), None);
        assert_eq!(parse_duration("18446744073709551615m"), None);
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Some(Duration::from_secs(u64::MAX))
        );
    }
}
