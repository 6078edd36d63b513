//! Match record model: one normalized row of the ladder table.

use serde::{Deserialize, Serialize};

/// The value a result flag carries when its slot won the game.
pub const WIN_FLAG: &str = "1";

/// Which of the two record slots a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// The slot across the table.
    pub fn opposite(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Result of Winner Determination for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Winner {
    FirstWon,
    SecondWon,
    Undetermined,
}

/// A game result seen from one player's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Unknown,
}

impl Winner {
    /// The winning slot, if there is one.
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::FirstWon => Some(Side::First),
            Winner::SecondWon => Some(Side::Second),
            Winner::Undetermined => None,
        }
    }

    /// Orient the result to the player sitting in `side`.
    pub fn outcome_for(self, side: Side) -> Outcome {
        match self.side() {
            Some(won) if won == side => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Unknown,
        }
    }
}

/// One competitor slot of a match record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    /// Case-folded identifier, the unique player key
    pub id: String,

    /// Identifier in its original casing, for display
    pub display_name: String,

    /// Tier label at the time of the match
    pub tier: String,

    /// Race code (T, P, Z)
    pub race: String,

    /// Outer result flag (carried through, not used for scoring)
    pub result_outer: String,

    /// Designated result flag: "1" when this slot won
    pub result: String,
}

/// A single game between two identified competitors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Row identifier from the source table
    pub no: String,

    /// Match date, lexicographically sortable (YYYY-MM-DD)
    pub date: String,

    /// Tournament / competition name
    pub tournament: String,

    pub status: String,

    pub match_type: String,

    /// Round or stage label
    pub round: String,

    /// Case-folded map code
    pub map: String,

    pub points: String,

    pub first: Competitor,

    pub second: Competitor,

    /// End-of-match result field (winner's race)
    pub result: String,

    pub remark: String,

    /// Competition category tag (e.g. "AXL")
    pub category: String,
}

impl MatchRecord {
    /// Winner Determination: the first slot's flag is checked before the
    /// second, anything other than exactly one "1" is undetermined.
    pub fn winner(&self) -> Winner {
        let first = self.first.result == WIN_FLAG;
        let second = self.second.result == WIN_FLAG;
        match (first, second) {
            (true, false) => Winner::FirstWon,
            (false, true) => Winner::SecondWon,
            _ => Winner::Undetermined,
        }
    }

    pub fn competitor(&self, side: Side) -> &Competitor {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Slots occupied by `player_id`. A row naming the same player twice
    /// yields both slots.
    pub fn sides_of<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = Side> + 'a {
        [Side::First, Side::Second]
            .into_iter()
            .filter(move |side| self.competitor(*side).id == player_id)
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.first.id == player_id || self.second.id == player_id
    }

    /// Result of this record for `player_id`, taken from the first slot they occupy.
    pub fn outcome_for(&self, player_id: &str) -> Option<Outcome> {
        self.sides_of(player_id)
            .next()
            .map(|side| self.winner().outcome_for(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first_flag: &str, second_flag: &str) -> MatchRecord {
        MatchRecord {
            first: Competitor {
                id: "alice".to_string(),
                result: first_flag.to_string(),
                ..Default::default()
            },
            second: Competitor {
                id: "bob".to_string(),
                result: second_flag.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_winner_first() {
        assert_eq!(record("1", "").winner(), Winner::FirstWon);
        assert_eq!(record("1", "0").winner(), Winner::FirstWon);
    }

    #[test]
    fn test_winner_second() {
        assert_eq!(record("", "1").winner(), Winner::SecondWon);
    }

    #[test]
    fn test_winner_ambiguous() {
        assert_eq!(record("", "").winner(), Winner::Undetermined);
        assert_eq!(record("1", "1").winner(), Winner::Undetermined);
        // Only the literal "1" counts
        assert_eq!(record(" 1", "true").winner(), Winner::Undetermined);
    }

    #[test]
    fn test_outcome_for_player() {
        let r = record("1", "");
        assert_eq!(r.outcome_for("alice"), Some(Outcome::Win));
        assert_eq!(r.outcome_for("bob"), Some(Outcome::Loss));
        assert_eq!(r.outcome_for("carol"), None);

        let r = record("", "");
        assert_eq!(r.outcome_for("alice"), Some(Outcome::Unknown));
    }

    #[test]
    fn test_sides_of_self_match() {
        let mut r = record("1", "");
        r.second.id = "alice".to_string();
        let sides: Vec<Side> = r.sides_of("alice").collect();
        assert_eq!(sides, vec![Side::First, Side::Second]);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::First.opposite(), Side::Second);
        assert_eq!(Side::Second.opposite(), Side::First);
    }

    #[test]
    fn test_record_serialization_camel_case() {
        let r = record("1", "");
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"matchType\""));
        assert!(json.contains("\"displayName\""));
    }
}
