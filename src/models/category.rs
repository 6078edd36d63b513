//! Competition categories tracked as separate tallies per player.

use serde::{Deserialize, Serialize};

/// The closed set of categories recognized in the category remark column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Primary league
    League,
    /// Pro / partner league
    ProLeague,
    /// Individual bracket
    Solo,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::League, Category::ProLeague, Category::Solo];

    /// The exact remark value that tags a match with this category.
    pub fn remark_label(&self) -> &'static str {
        match self {
            Category::League => "AXL",
            Category::ProLeague => "AXPL",
            Category::Solo => "개인전",
        }
    }

    /// Resolve a (trimmed) remark value. Anything outside the set is `None`.
    pub fn from_remark(remark: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| !remark.is_empty() && c.remark_label() == remark)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.remark_label())
    }
}
