//! Compact projection of a [`GameState`] snapshot.
//!
//! [`Stats`] is the exact document sent to the AI writer and the input of the
//! fallback generator, so both paths see the same shape. Rows are copied in
//! input order; nothing is filtered or sorted here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use riftfall_common::{BattleResult, ContinentStatus, GameState, Role};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub continents: Vec<ContinentSummary>,
    pub totals: Totals,
    pub last_defenses: Vec<DefenseSummary>,
    pub top_defenders: Vec<DefenderSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinentSummary {
    pub code: String,
    pub name: String,
    pub max_health: f64,
    pub current_health: f64,
    pub status: ContinentStatus,
}

impl ContinentSummary {
    pub fn is_fallen(&self) -> bool {
        self.status == ContinentStatus::Fallen || self.current_health <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total_players: i64,
    pub per_role: BTreeMap<Role, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefenseSummary {
    pub continent_id: i64,
    pub username: Option<String>,
    pub role: Role,
    pub score: i64,
    pub hp_delta: f64,
    pub result: BattleResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefenderSummary {
    pub continent_id: i64,
    pub username: Option<String>,
    pub role: Role,
    pub total_score: i64,
    pub runs: i64,
}

pub fn project(state: &GameState) -> Stats {
    let continents = state
        .continents
        .iter()
        .map(|c| ContinentSummary {
            code: c.code.clone(),
            name: c.name.clone(),
            max_health: c.max_health,
            current_health: c.current_health,
            status: c.status,
        })
        .collect();

    // A role listed twice keeps its last count.
    let per_role = state
        .players_per_role
        .iter()
        .map(|r| (r.role, r.total_players))
        .collect();

    let last_defenses = state
        .last_defenses
        .iter()
        .map(|d| DefenseSummary {
            continent_id: d.continent_id,
            username: d.username.clone(),
            role: d.role,
            score: d.score,
            hp_delta: d.hp_delta,
            result: d.result,
            created_at: d.created_at,
        })
        .collect();

    let top_defenders = state
        .top_defenders
        .iter()
        .map(|d| DefenderSummary {
            continent_id: d.continent_id,
            username: d.username.clone(),
            role: d.role,
            total_score: d.total_score,
            runs: d.runs,
        })
        .collect();

    Stats {
        continents,
        totals: Totals {
            total_players: state.total_players.total_players,
            per_role,
        },
        last_defenses,
        top_defenders,
    }
}
