//! Labels, scale and rating bands for the six base stats.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub short_label: &'static str,
    /// Highest base value any entity has for this stat.
    pub max_value: u32,
}

pub const STATS: [StatMeta; 6] = [
    StatMeta { key: "hp", label: "HP", short_label: "HP", max_value: 255 },
    StatMeta { key: "attack", label: "Attack", short_label: "ATK", max_value: 190 },
    StatMeta { key: "defense", label: "Defense", short_label: "DEF", max_value: 230 },
    StatMeta { key: "special-attack", label: "Special Attack", short_label: "Sp. Atk", max_value: 194 },
    StatMeta { key: "special-defense", label: "Special Defense", short_label: "Sp. Def", max_value: 230 },
    StatMeta { key: "speed", label: "Speed", short_label: "SPD", max_value: 200 },
];

/// Look up by key, case-insensitive, with whitespace runs read as `-`.
pub fn stat_meta(key: &str) -> Option<&'static StatMeta> {
    let normalized = key
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    STATS.iter().find(|meta| meta.key == normalized)
}

/// Short label, or the key itself when unknown.
pub fn stat_label(key: &str) -> &str {
    stat_meta(key).map_or(key, |meta| meta.short_label)
}

/// Bar fill percentage, capped at 100.
pub fn stat_width(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 100.0;
    }
    (f64::from(value) / f64::from(max) * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatRating {
    Low,
    Average,
    High,
    Excellent,
}

impl StatRating {
    pub fn for_value(value: u32) -> Self {
        match value {
            0..=49 => StatRating::Low,
            50..=79 => StatRating::Average,
            80..=119 => StatRating::High,
            _ => StatRating::Excellent,
        }
    }
}

impl fmt::Display for StatRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatRating::Low => "Low",
            StatRating::Average => "Average",
            StatRating::High => "High",
            StatRating::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}
