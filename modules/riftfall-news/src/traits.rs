// Trait boundaries between the news run and the outside world.
//
// GameSource / WorldResetter: the game backend (reads once, resets on collapse).
// NewsStore: the versioned news history file.
// NewsWriter: the AI summarizer.
//
// Production adapters live in source.rs, store.rs and synthesis/writer.rs;
// testing.rs has in-memory mocks for each.

use anyhow::Result;
use async_trait::async_trait;

use riftfall_common::{Continent, GameState, NewsFile};

use crate::stats::Stats;
use crate::synthesis::DraftItem;

#[async_trait]
pub trait GameSource: Send + Sync {
    /// Read the full snapshot for one run.
    async fn fetch_state(&self) -> Result<GameState>;

    /// Read only the continent list.
    async fn continents(&self) -> Result<Vec<Continent>>;
}

#[async_trait]
pub trait WorldResetter: Send + Sync {
    /// Restore every continent to full health and clear defense history.
    /// Fetches the continent list itself when `continents` is `None`.
    async fn reset_world(&self, continents: Option<&[Continent]>) -> Result<()>;
}

/// A news file as read from the store, with the token needed to write it back.
#[derive(Debug, Clone)]
pub struct LoadedNews {
    pub news: NewsFile,
    /// `None` when the file does not exist yet.
    pub sha: Option<String>,
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn load(&self) -> Result<LoadedNews>;

    /// Write the full document. Fails if `sha` no longer matches the stored
    /// version.
    async fn save(&self, news: &NewsFile, sha: Option<&str>) -> Result<()>;
}

#[async_trait]
pub trait NewsWriter: Send + Sync {
    async fn write(&self, stats: &Stats) -> Result<Vec<DraftItem>>;
}
