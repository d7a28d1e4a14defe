use crate::stats::{ContinentSummary, Stats};

use super::DraftItem;

/// Number of defenders named in a fallback bulletin.
const FALLBACK_DEFENDERS: usize = 3;

/// Deterministic single-item bulletin used when the AI writer is unavailable
/// or returns nothing usable.
pub fn fallback_items(stats: &Stats) -> Vec<DraftItem> {
    let fallen: Vec<&ContinentSummary> = stats.continents.iter().filter(|c| c.is_fallen()).collect();

    let title = if fallen.is_empty() {
        format!("Lines hold across {} continents", stats.continents.len())
    } else {
        let plural = if fallen.len() > 1 { "s" } else { "" };
        format!("Crisis across {} front{plural}", fallen.len())
    };

    let front = if fallen.is_empty() {
        let name = weakest(&stats.continents)
            .map(|c| c.name.as_str())
            .unwrap_or("Front lines");
        format!("{name} took the heaviest fire but remains standing.")
    } else {
        let names: Vec<&str> = fallen.iter().map(|c| c.name.as_str()).collect();
        format!(
            "{} reported fallen. Command readies reset protocols.",
            names.join(", ")
        )
    };

    let top: Vec<String> = stats
        .top_defenders
        .iter()
        .take(FALLBACK_DEFENDERS)
        .map(|d| {
            format!(
                "{} ({} pts)",
                d.username.as_deref().unwrap_or("Unknown"),
                d.total_score
            )
        })
        .collect();
    let defenders = if top.is_empty() {
        "Defender roster data limited this cycle.".to_string()
    } else {
        format!("Notable defenders: {}.", top.join(", "))
    };

    let players = format!(
        "Total players involved: {}.",
        stats.totals.total_players
    );

    vec![DraftItem {
        title,
        body: [front, defenders, players].join(" "),
    }]
}

/// Continent with the lowest current health; the first one wins a tie.
pub fn weakest(continents: &[ContinentSummary]) -> Option<&ContinentSummary> {
    continents
        .iter()
        .min_by(|a, b| a.current_health.total_cmp(&b.current_health))
}
