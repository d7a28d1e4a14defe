use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinentStatus {
    Ok,
    Fallen,
}

impl std::fmt::Display for ContinentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContinentStatus::Ok => write!(f, "ok"),
            ContinentStatus::Fallen => write!(f, "fallen"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Attack,
    Defend,
    Gamble,
    Science,
    Gather,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Attack => write!(f, "attack"),
            Role::Defend => write!(f, "defend"),
            Role::Gamble => write!(f, "gamble"),
            Role::Science => write!(f, "science"),
            Role::Gather => write!(f, "gather"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    Success,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsItemType {
    Summary,
    CycleEnd,
    CycleReset,
}

impl std::fmt::Display for NewsItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsItemType::Summary => write!(f, "summary"),
            NewsItemType::CycleEnd => write!(f, "cycle_end"),
            NewsItemType::CycleReset => write!(f, "cycle_reset"),
        }
    }
}

// --- Game state ---

/// A world region tracked by the simulation backend (`continents` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub max_health: f64,
    pub current_health: f64,
    #[serde(default)]
    pub passive_damage_per_minute: f64,
    /// Written independently of `current_health` and may lag behind it;
    /// use [`Continent::is_fallen`] rather than reading this alone.
    pub status: ContinentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_health_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Continent {
    pub fn is_fallen(&self) -> bool {
        self.status == ContinentStatus::Fallen || self.current_health <= 0.0
    }
}

/// Row of `v_total_players`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalPlayers {
    pub total_players: i64,
}

/// Row of `v_total_players_per_role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePlayers {
    pub role: Role,
    pub total_players: i64,
}

/// Row of `v_last_10_defenses_per_continent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseEvent {
    pub continent_id: i64,
    pub device_hash: String,
    pub username: Option<String>,
    pub role: Role,
    pub difficulty_level: i32,
    pub score: i64,
    pub hp_delta: f64,
    pub result: BattleResult,
    pub created_at: DateTime<Utc>,
}

/// Row of `v_top_10_defenders_per_continent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDefender {
    pub continent_id: i64,
    pub device_hash: String,
    pub username: Option<String>,
    pub role: Role,
    pub total_score: i64,
    pub runs: i64,
}

/// Everything one daemon run reads from the game backend. Fetched once,
/// never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub continents: Vec<Continent>,
    pub total_players: TotalPlayers,
    pub players_per_role: Vec<RolePlayers>,
    pub last_defenses: Vec<DefenseEvent>,
    pub top_defenders: Vec<TopDefender>,
}

// --- News ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderMeta {
    pub username: Option<String>,
    pub role: Role,
    pub continent_code: String,
    pub total_score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallen_continents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_defenders: Option<Vec<DefenderMeta>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_number: Option<u32>,
    /// Keys written by other producers, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: NewsItemType,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: NewsMeta,
}

pub const NEWS_FILE_VERSION: u32 = 1;

/// The persisted news log. Items are append-only, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsFile {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

impl NewsFile {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: NEWS_FILE_VERSION,
            generated_at: now,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn continent_json(health: f64, status: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "code": "NA",
            "name": "North Aster",
            "max_health": 100,
            "current_health": health,
            "passive_damage_per_minute": 0.5,
            "status": status,
            "created_at": "2025-03-01T10:00:00.000+00:00",
            "last_health_update": null,
            "metadata": null
        })
    }

    #[test]
    fn continent_fallen_by_status_or_health() {
        let by_status: Continent = serde_json::from_value(continent_json(40.0, "fallen")).unwrap();
        let by_health: Continent = serde_json::from_value(continent_json(0.0, "ok")).unwrap();
        let healthy: Continent = serde_json::from_value(continent_json(40.0, "ok")).unwrap();
        assert!(by_status.is_fallen());
        assert!(by_health.is_fallen());
        assert!(!healthy.is_fallen());
    }

    #[test]
    fn news_item_round_trips_type_and_unknown_meta() {
        let raw = json!({
            "id": "V1StGXR8_Z5jdHi6B-myT",
            "type": "cycle_reset",
            "title": "Cycle 2 begins",
            "body": "World data reset.",
            "created_at": "2025-03-01T10:00:00.000Z",
            "meta": {"cycle_number": 2, "continent_code": null, "source": "manual"}
        });
        let item: NewsItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.item_type, NewsItemType::CycleReset);
        assert_eq!(item.meta.cycle_number, Some(2));
        assert_eq!(item.meta.extra.get("source"), Some(&json!("manual")));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["type"], "cycle_reset");
        assert_eq!(back["meta"]["source"], "manual");
        assert!(back["meta"].get("fallen_continents").is_none());
    }

    #[test]
    fn empty_news_file_has_current_version() {
        let file = NewsFile::empty(Utc::now());
        assert_eq!(file.version, NEWS_FILE_VERSION);
        assert!(file.items.is_empty());
    }
}
