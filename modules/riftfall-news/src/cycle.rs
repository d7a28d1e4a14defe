//! Cycle detection and transition.
//!
//! A cycle ends when every continent has fallen. Nothing about cycles is
//! stored except the news log itself: the current cycle number is one more
//! than the number of `cycle_reset` items already written.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use riftfall_common::{Continent, DefenderMeta, GameState, NewsItem, NewsItemType, NewsMeta};

use crate::notify::NotifyBackend;
use crate::traits::WorldResetter;

/// Defenders copied into summary metadata.
const META_TOP_DEFENDERS: usize = 5;

const RESET_BODY: &str =
    "World data reset: continents restored to full health, defenses cleared.";

pub fn fallen_continents(continents: &[Continent]) -> Vec<&Continent> {
    continents.iter().filter(|c| c.is_fallen()).collect()
}

/// True only for a non-empty world where every continent has fallen.
pub fn all_fallen(continents: &[Continent]) -> bool {
    !continents.is_empty() && continents.iter().all(Continent::is_fallen)
}

pub fn cycle_number(history: &[NewsItem]) -> u32 {
    let resets = history
        .iter()
        .filter(|i| i.item_type == NewsItemType::CycleReset)
        .count();
    resets as u32 + 1
}

/// First five defenders with their continent resolved to its code. Unknown
/// continent ids resolve to an empty code.
pub fn top_defenders_meta(state: &GameState) -> Vec<DefenderMeta> {
    let codes: HashMap<i64, &str> = state
        .continents
        .iter()
        .map(|c| (c.id, c.code.as_str()))
        .collect();

    state
        .top_defenders
        .iter()
        .take(META_TOP_DEFENDERS)
        .map(|d| DefenderMeta {
            username: d.username.clone(),
            role: d.role,
            continent_code: codes.get(&d.continent_id).copied().unwrap_or_default().to_string(),
            total_score: d.total_score,
        })
        .collect()
}

/// Outcome of checking one snapshot against the news history.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleEvaluation {
    /// Number of the cycle the snapshot belongs to.
    pub cycle_number: u32,
    /// Metadata for this run's summary items.
    pub summary_meta: NewsMeta,
    pub reset_required: bool,
    fallen_names: Vec<String>,
    fallen_codes: Vec<String>,
}

pub fn evaluate_cycle(state: &GameState, history: &[NewsItem]) -> CycleEvaluation {
    let fallen = fallen_continents(&state.continents);
    let fallen_codes: Vec<String> = fallen.iter().map(|c| c.code.clone()).collect();

    CycleEvaluation {
        cycle_number: cycle_number(history),
        summary_meta: NewsMeta {
            fallen_continents: Some(fallen_codes.clone()),
            top_defenders: Some(top_defenders_meta(state)),
            ..Default::default()
        },
        reset_required: all_fallen(&state.continents),
        fallen_names: fallen.iter().map(|c| c.name.clone()).collect(),
        fallen_codes,
    }
}

impl CycleEvaluation {
    /// The `cycle_end` and `cycle_reset` items for a collapse, in that order.
    /// Empty when no reset is required.
    pub fn extra_items(&self, now: DateTime<Utc>) -> Vec<NewsItem> {
        if !self.reset_required {
            return Vec::new();
        }
        vec![self.cycle_end_item(now), self.cycle_reset_item(now)]
    }

    pub fn cycle_end_item(&self, now: DateTime<Utc>) -> NewsItem {
        let body = if self.fallen_names.is_empty() {
            "All fronts reported lost. Reset incoming.".to_string()
        } else {
            format!(
                "{} have fallen. Command declares the cycle lost. Reset incoming.",
                self.fallen_names.join(", ")
            )
        };

        NewsItem {
            id: Uuid::new_v4().to_string(),
            item_type: NewsItemType::CycleEnd,
            title: format!("Cycle {} collapse", self.cycle_number),
            body,
            created_at: now,
            meta: NewsMeta {
                fallen_continents: Some(self.fallen_codes.clone()),
                cycle_number: Some(self.cycle_number),
                ..Default::default()
            },
        }
    }

    pub fn cycle_reset_item(&self, now: DateTime<Utc>) -> NewsItem {
        let next = self.cycle_number + 1;
        NewsItem {
            id: Uuid::new_v4().to_string(),
            item_type: NewsItemType::CycleReset,
            title: format!("Cycle {next} begins"),
            body: RESET_BODY.to_string(),
            created_at: now,
            meta: NewsMeta {
                cycle_number: Some(next),
                ..Default::default()
            },
        }
    }

    pub fn collapse_message(&self) -> String {
        format!(
            "Riftfall cycle {} ended. All continents have fallen.",
            self.cycle_number
        )
    }

    pub fn reset_message(&self) -> String {
        format!(
            "Riftfall cycle {} has begun after reset.",
            self.cycle_number + 1
        )
    }
}

/// Carries out a collapse: announce, reset the live world, announce again.
pub struct CycleOrchestrator {
    resetter: Arc<dyn WorldResetter>,
    notifier: Arc<dyn NotifyBackend>,
}

impl CycleOrchestrator {
    pub fn new(resetter: Arc<dyn WorldResetter>, notifier: Arc<dyn NotifyBackend>) -> Self {
        Self { resetter, notifier }
    }

    /// Returns whether a reset ran. Notification failures are logged and
    /// ignored; a reset failure aborts.
    pub async fn execute(
        &self,
        evaluation: &CycleEvaluation,
        continents: &[Continent],
    ) -> Result<bool> {
        if !evaluation.reset_required {
            return Ok(false);
        }

        info!(
            cycle = evaluation.cycle_number,
            fallen = ?evaluation.fallen_codes,
            "All continents fallen, closing cycle"
        );
        self.notify(&evaluation.collapse_message()).await;

        self.resetter.reset_world(Some(continents)).await?;
        info!(next_cycle = evaluation.cycle_number + 1, "World reset complete");

        self.notify(&evaluation.reset_message()).await;
        Ok(true)
    }

    async fn notify(&self, message: &str) {
        if let Err(e) = self.notifier.send(message).await {
            warn!(error = %e, "Failed to send cycle notification");
        }
    }
}
