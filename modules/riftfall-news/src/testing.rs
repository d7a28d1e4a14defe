// Test mocks for the news run.
//
// One mock per trait boundary:
// - MockGameSource (GameSource): fixed snapshot
// - MockResetter (WorldResetter): records the continent codes it was asked to reset
// - MockNewsStore (NewsStore): in-memory file with sha bookkeeping
// - RecordingNotifier (NotifyBackend): captures messages
// - ScriptedWriter (NewsWriter): canned drafts or a canned error
//
// Plus fixture builders for continents, defenders and news items.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use riftfall_common::{
    BattleResult, Continent, ContinentStatus, DefenseEvent, GameState, NewsFile, NewsItem,
    NewsItemType, NewsMeta, RiftfallError, Role, TopDefender, TotalPlayers,
};

use crate::notify::NotifyBackend;
use crate::stats::Stats;
use crate::synthesis::DraftItem;
use crate::traits::{GameSource, LoadedNews, NewsStore, NewsWriter, WorldResetter};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn continent(id: i64, code: &str, name: &str, health: f64, status: ContinentStatus) -> Continent {
    Continent {
        id,
        code: code.to_string(),
        name: name.to_string(),
        max_health: 100.0,
        current_health: health,
        passive_damage_per_minute: 0.5,
        status,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        last_health_update: None,
        metadata: None,
    }
}

pub fn top_defender(continent_id: i64, username: Option<&str>, total_score: i64) -> TopDefender {
    TopDefender {
        continent_id,
        device_hash: format!("dev-{continent_id}-{total_score}"),
        username: username.map(str::to_string),
        role: Role::Defend,
        total_score,
        runs: 1,
    }
}

pub fn defense(continent_id: i64, username: Option<&str>, score: i64) -> DefenseEvent {
    DefenseEvent {
        continent_id,
        device_hash: format!("dev-{continent_id}"),
        username: username.map(str::to_string),
        role: Role::Defend,
        difficulty_level: 2,
        score,
        hp_delta: 1.5,
        result: BattleResult::Success,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap(),
    }
}

pub fn game_state(continents: Vec<Continent>) -> GameState {
    GameState {
        continents,
        total_players: TotalPlayers { total_players: 12 },
        ..Default::default()
    }
}

pub fn news_item(item_type: NewsItemType) -> NewsItem {
    NewsItem {
        id: Uuid::new_v4().to_string(),
        item_type,
        title: format!("{item_type} bulletin"),
        body: "Filed from the front.".to_string(),
        created_at: Utc::now(),
        meta: NewsMeta::default(),
    }
}

pub fn titled_item(title: &str) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        ..news_item(NewsItemType::Summary)
    }
}

/// A news file holding the given items.
pub fn news_file(items: Vec<NewsItem>) -> NewsFile {
    let mut file = NewsFile::empty(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    file.items = items;
    file
}

// ---------------------------------------------------------------------------
// MockGameSource
// ---------------------------------------------------------------------------

pub struct MockGameSource {
    state: GameState,
    fail: bool,
}

impl MockGameSource {
    pub fn new(state: GameState) -> Self {
        Self { state, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            state: GameState::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl GameSource for MockGameSource {
    async fn fetch_state(&self) -> Result<GameState> {
        if self.fail {
            bail!(RiftfallError::Source("MockGameSource: backend down".into()));
        }
        Ok(self.state.clone())
    }

    async fn continents(&self) -> Result<Vec<Continent>> {
        Ok(self.state.continents.clone())
    }
}

// ---------------------------------------------------------------------------
// MockResetter
// ---------------------------------------------------------------------------

pub struct MockResetter {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl MockResetter {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Continent codes passed to each `reset_world` call.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockResetter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorldResetter for MockResetter {
    async fn reset_world(&self, continents: Option<&[Continent]>) -> Result<()> {
        if self.fail {
            bail!(RiftfallError::Reset("MockResetter: update rejected".into()));
        }
        let codes = continents
            .unwrap_or_default()
            .iter()
            .map(|c| c.code.clone())
            .collect();
        self.calls.lock().unwrap().push(codes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockNewsStore
// ---------------------------------------------------------------------------

struct MockNewsStoreInner {
    current: Option<(NewsFile, String)>,
    saves: Vec<NewsFile>,
    revision: usize,
    fail_load: bool,
    racing: bool,
}

/// In-memory news file. Every save bumps the sha; a save with a stale sha is
/// rejected as a conflict, the same way the GitHub store behaves.
pub struct MockNewsStore {
    inner: Mutex<MockNewsStoreInner>,
}

impl MockNewsStore {
    /// No file stored yet.
    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(MockNewsStoreInner {
                current: None,
                saves: Vec::new(),
                revision: 0,
                fail_load: false,
                racing: false,
            }),
        }
    }

    pub fn with_file(file: NewsFile) -> Self {
        let store = Self::empty();
        {
            let mut inner = store.inner.lock().unwrap();
            inner.revision = 1;
            inner.current = Some((file, "sha-1".to_string()));
        }
        store
    }

    pub fn failing_loads(self) -> Self {
        self.inner.lock().unwrap().fail_load = true;
        self
    }

    /// Every load is followed by another writer committing, so the caller's
    /// sha is already stale when it saves.
    pub fn racing(self) -> Self {
        self.inner.lock().unwrap().racing = true;
        self
    }

    pub fn saves(&self) -> Vec<NewsFile> {
        self.inner.lock().unwrap().saves.clone()
    }

    pub fn current(&self) -> Option<NewsFile> {
        self.inner.lock().unwrap().current.as_ref().map(|(f, _)| f.clone())
    }
}

#[async_trait]
impl NewsStore for MockNewsStore {
    async fn load(&self) -> Result<LoadedNews> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_load {
            bail!(RiftfallError::Store("MockNewsStore: load failed".into()));
        }
        let loaded = match &inner.current {
            Some((news, sha)) => LoadedNews {
                news: news.clone(),
                sha: Some(sha.clone()),
            },
            None => LoadedNews {
                news: NewsFile::empty(Utc::now()),
                sha: None,
            },
        };
        if inner.racing {
            inner.revision += 1;
            let sha = format!("sha-{}", inner.revision);
            let file = inner
                .current
                .as_ref()
                .map(|(f, _)| f.clone())
                .unwrap_or_else(|| NewsFile::empty(Utc::now()));
            inner.current = Some((file, sha));
        }
        Ok(loaded)
    }

    async fn save(&self, news: &NewsFile, sha: Option<&str>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let current_sha = inner.current.as_ref().map(|(_, s)| s.as_str());
        if current_sha != sha {
            return Err(RiftfallError::StoreConflict {
                path: "data/news/news.json".into(),
            }
            .into());
        }
        inner.revision += 1;
        let next = format!("sha-{}", inner.revision);
        inner.current = Some((news.clone(), next));
        inner.saves.push(news.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Records every message, then reports a delivery failure.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifyBackend for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            bail!("RecordingNotifier: webhook returned 500");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedWriter
// ---------------------------------------------------------------------------

pub struct ScriptedWriter {
    response: std::result::Result<Vec<DraftItem>, String>,
    calls: AtomicUsize,
}

impl ScriptedWriter {
    pub fn returning(drafts: Vec<DraftItem>) -> Self {
        Self {
            response: Ok(drafts),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            response: Err(error.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NewsWriter for ScriptedWriter {
    async fn write(&self, _stats: &Stats) -> Result<Vec<DraftItem>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.response.clone().map_err(|e| anyhow!(e))
    }
}
