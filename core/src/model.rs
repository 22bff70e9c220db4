//! Render-ready view models.
//!
//! Plain data handed to the presentation layer. Serialized field names are
//! camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category used for a move whose detail lookup failed.
pub const FALLBACK_MOVE_TYPE: &str = "normal";

/// Primary ability when no visible ability exists.
pub const UNKNOWN_ABILITY: &str = "unknown";

/// One row of the list view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub base_experience: u32,
    pub types: Vec<String>,
    pub hp: u32,
    pub speed: u32,
    pub primary_ability: String,
}

/// Everything the detail view shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub artwork: Option<String>,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub stats: BaseStats,
    pub height: u32,
    pub weight: u32,
    pub base_experience: u32,
    pub abilities: Vec<Ability>,
    pub moves: Vec<MoveSummary>,
    pub evolution_chain: Vec<LineageStage>,
}

/// The six base stats; each missing one is zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    /// `(upstream key, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, u32); 6] {
        [
            ("hp", self.hp),
            ("attack", self.attack),
            ("defense", self.defense),
            ("special-attack", self.special_attack),
            ("special-defense", self.special_defense),
            ("speed", self.speed),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One entry of an evolution line. `id` is 0 when the stage could not be
/// looked up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineageStage {
    pub name: String,
    pub id: u32,
    pub sprite: Option<String>,
}

/// Summary over one page of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub average_hp: f64,
    /// Type name to integer percentage of all type occurrences.
    pub type_distribution: BTreeMap<String, u32>,
    pub most_powerful: Option<TopScorer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopScorer {
    pub name: String,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Hp,
    Speed,
    BaseExperience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}
