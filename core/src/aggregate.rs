//! Summary statistics over a page of table rows.

use std::collections::BTreeMap;

use crate::model::{CollectionStats, TableRow, TopScorer};

/// Count, mean hp (one decimal), type share of all type occurrences
/// (integer percent), and the row with the highest `hp + speed + base
/// experience`. Ties keep the earliest row.
pub fn compute_stats(rows: &[TableRow]) -> CollectionStats {
    if rows.is_empty() {
        return CollectionStats::default();
    }

    let total = rows.len();
    let hp_sum: u64 = rows.iter().map(|r| u64::from(r.hp)).sum();
    let average_hp = round_to_tenth(hp_sum as f64 / total as f64);

    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    for kind in rows.iter().flat_map(|r| r.types.iter()) {
        *type_counts.entry(kind.clone()).or_insert(0) += 1;
    }
    let occurrences: usize = type_counts.values().sum();
    let type_distribution = type_counts
        .into_iter()
        .map(|(kind, count)| {
            let percent = (count as f64 / occurrences as f64 * 100.0).round() as u32;
            (kind, percent)
        })
        .collect();

    let mut most_powerful: Option<TopScorer> = None;
    for row in rows {
        let score = u64::from(row.hp) + u64::from(row.speed) + u64::from(row.base_experience);
        if most_powerful.as_ref().map_or(true, |best| score > best.score) {
            most_powerful = Some(TopScorer {
                name: row.name.clone(),
                score,
            });
        }
    }

    CollectionStats {
        total,
        average_hp,
        type_distribution,
        most_powerful,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
