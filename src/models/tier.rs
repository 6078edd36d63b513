//! Tier side table mapping player ids to tier labels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tier labels keyed by case-folded player id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    tiers: HashMap<String, String>,
}

impl TierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a player's tier. The id is case-folded; later entries win.
    pub fn insert(&mut self, player_id: &str, tier: &str) {
        self.tiers
            .insert(player_id.trim().to_lowercase(), tier.trim().to_string());
    }

    pub fn get(&self, player_id: &str) -> Option<&str> {
        self.tiers.get(player_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
