//! Map catalog: display names for the map codes used in the match table.

use serde::{Deserialize, Serialize};

/// A known map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInfo {
    /// Code as it appears in the match table (case-folded)
    pub code: String,

    /// Human-readable name
    pub name: String,
}

impl MapInfo {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.trim().to_lowercase(),
            name: name.to_string(),
        }
    }
}

/// Lookup table from map code to display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCatalog {
    maps: Vec<MapInfo>,
}

impl MapCatalog {
    pub fn new(maps: Vec<MapInfo>) -> Self {
        Self { maps }
    }

    /// Display name for `code`; unknown codes are shown as-is.
    pub fn name_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.maps
            .iter()
            .find(|m| m.code == code)
            .map(|m| m.name.as_str())
            .unwrap_or(code)
    }
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::new(vec![
            MapInfo::new("ckt.brk", "Circuit Breaker"),
            MapInfo::new("death.v", "Death Valley"),
            MapInfo::new("dejavu", "Deja Vu"),
            MapInfo::new("dom.", "Dominator"),
            MapInfo::new("dark", "Dark Origin"),
            MapInfo::new("eclipse", "Eclipse"),
            MapInfo::new("투혼", "Fighting Spirit"),
            MapInfo::new("forfeit", "Forfeit"),
            MapInfo::new("k.o", "Knockout"),
            MapInfo::new("litmus", "Litmus"),
            MapInfo::new("polstar", "Polaris Rhapsody"),
            MapInfo::new("poly", "Polypoid"),
            MapInfo::new("radeon", "Radeon"),
            MapInfo::new("u.d.m", "Uldolmok"),
            MapInfo::new("verm.", "Vermeer"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_map() {
        let catalog = MapCatalog::default();
        assert_eq!(catalog.name_for("dejavu"), "Deja Vu");
        assert_eq!(catalog.name_for("투혼"), "Fighting Spirit");
    }

    #[test]
    fn test_unknown_map_falls_back_to_code() {
        let catalog = MapCatalog::default();
        assert_eq!(catalog.name_for("newmap"), "newmap");
    }

    #[test]
    fn test_codes_are_case_folded() {
        let info = MapInfo::new(" Sylphid ", "Sylphid");
        assert_eq!(info.code, "sylphid");
    }
}
