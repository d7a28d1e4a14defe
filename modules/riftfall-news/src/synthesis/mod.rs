pub mod fallback;
pub mod writer;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use riftfall_common::{NewsItem, NewsItemType, NewsMeta};

use crate::stats::Stats;
use crate::traits::NewsWriter;

pub use fallback::fallback_items;
pub use writer::{parse_drafts, AiNewsWriter};

/// Title and body of a news item before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSource {
    Ai,
    Fallback,
}

impl std::fmt::Display for DraftSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftSource::Ai => write!(f, "ai"),
            DraftSource::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Synthesis {
    pub items: Vec<NewsItem>,
    pub source: DraftSource,
}

/// Turns projected stats into news items: AI first, deterministic fallback
/// otherwise. Never fails.
pub struct NewsSynthesizer {
    writer: Option<Arc<dyn NewsWriter>>,
}

impl NewsSynthesizer {
    pub fn new(writer: Option<Arc<dyn NewsWriter>>) -> Self {
        Self { writer }
    }

    /// A synthesizer with AI disabled.
    pub fn fallback_only() -> Self {
        Self { writer: None }
    }

    pub fn ai_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Ask the AI writer for drafts. `None` when AI is disabled, the call
    /// fails, or it produced nothing.
    pub async fn try_external(&self, stats: &Stats) -> Option<Vec<DraftItem>> {
        let writer = self.writer.as_ref()?;
        match writer.write(stats).await {
            Ok(drafts) if !drafts.is_empty() => Some(drafts),
            Ok(_) => {
                warn!("AI writer returned no items");
                None
            }
            Err(e) => {
                warn!(error = %e, "AI writer failed");
                None
            }
        }
    }

    pub async fn drafts(&self, stats: &Stats) -> (Vec<DraftItem>, DraftSource) {
        match self.try_external(stats).await {
            Some(drafts) => (drafts, DraftSource::Ai),
            None => (fallback_items(stats), DraftSource::Fallback),
        }
    }

    pub async fn synthesize(
        &self,
        stats: &Stats,
        item_type: NewsItemType,
        meta: NewsMeta,
    ) -> Synthesis {
        let (drafts, source) = self.drafts(stats).await;
        info!(count = drafts.len(), %source, "Synthesized news drafts");
        Synthesis {
            items: attach(drafts, item_type, &meta, Utc::now()),
            source,
        }
    }
}

/// Give each draft a fresh id, the shared timestamp and a copy of `meta`.
pub fn attach(
    drafts: Vec<DraftItem>,
    item_type: NewsItemType,
    meta: &NewsMeta,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    drafts
        .into_iter()
        .map(|d| NewsItem {
            id: Uuid::new_v4().to_string(),
            item_type,
            title: d.title,
            body: d.body,
            created_at: now,
            meta: meta.clone(),
        })
        .collect()
}
