use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use postgrest_client::{Filter, PostgrestClient};
use riftfall_common::{
    Continent, DefenseEvent, GameState, RiftfallError, RolePlayers, TopDefender, TotalPlayers,
};

use crate::traits::{GameSource, WorldResetter};

const CONTINENTS: &str = "continents";
const DEFENSE_EVENTS: &str = "defense_events";
const V_TOTAL_PLAYERS: &str = "v_total_players";
const V_TOTAL_PLAYERS_PER_ROLE: &str = "v_total_players_per_role";
const V_LAST_10_DEFENSES: &str = "v_last_10_defenses_per_continent";
const V_TOP_10_DEFENDERS: &str = "v_top_10_defenders_per_continent";

/// Game backend on Supabase: tables and views read over PostgREST.
pub struct SupabaseGameSource {
    client: PostgrestClient,
}

impl SupabaseGameSource {
    pub fn new(project_url: &str, service_key: String) -> Self {
        Self {
            client: PostgrestClient::new(project_url, service_key),
        }
    }

    async fn fetch_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        self.client.select_all(table).await.map_err(|e| {
            RiftfallError::Source(format!("Supabase fetch failed for {table}: {e}")).into()
        })
    }

    async fn total_players(&self) -> Result<TotalPlayers> {
        let rows: Vec<TotalPlayers> = self.fetch_table(V_TOTAL_PLAYERS).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl GameSource for SupabaseGameSource {
    async fn fetch_state(&self) -> Result<GameState> {
        let (continents, total_players, players_per_role, last_defenses, top_defenders) = tokio::try_join!(
            self.fetch_table::<Continent>(CONTINENTS),
            self.total_players(),
            self.fetch_table::<RolePlayers>(V_TOTAL_PLAYERS_PER_ROLE),
            self.fetch_table::<DefenseEvent>(V_LAST_10_DEFENSES),
            self.fetch_table::<TopDefender>(V_TOP_10_DEFENDERS),
        )?;

        info!(
            continents = continents.len(),
            total_players = total_players.total_players,
            defenses = last_defenses.len(),
            defenders = top_defenders.len(),
            "Fetched game state"
        );

        Ok(GameState {
            continents,
            total_players,
            players_per_role,
            last_defenses,
            top_defenders,
        })
    }

    async fn continents(&self) -> Result<Vec<Continent>> {
        self.fetch_table(CONTINENTS).await
    }
}

#[async_trait]
impl WorldResetter for SupabaseGameSource {
    async fn reset_world(&self, continents: Option<&[Continent]>) -> Result<()> {
        let fetched;
        let to_reset = match continents {
            Some(list) => list,
            None => {
                fetched = self.continents().await?;
                fetched.as_slice()
            }
        };
        let now = Utc::now();

        if to_reset.is_empty() {
            self.client
                .update(
                    CONTINENTS,
                    &[Filter::not_null("id")],
                    &json!({ "status": "ok", "last_health_update": now }),
                )
                .await
                .map_err(|e| {
                    RiftfallError::Reset(format!("Failed to reset continents when list empty: {e}"))
                })?;
        } else {
            try_join_all(to_reset.iter().map(|continent| async move {
                self.client
                    .update(
                        CONTINENTS,
                        &[Filter::eq("id", continent.id)],
                        &json!({
                            "current_health": continent.max_health,
                            "status": "ok",
                            "last_health_update": now,
                        }),
                    )
                    .await
                    .map_err(|e| {
                        RiftfallError::Reset(format!(
                            "Failed to reset continent {}: {e}",
                            continent.code
                        ))
                    })
            }))
            .await?;
        }

        self.client
            .delete(DEFENSE_EVENTS, &[Filter::neq("id", -1)])
            .await
            .map_err(|e| RiftfallError::Reset(format!("Failed to clear defense_events: {e}")))?;

        info!(continents = to_reset.len(), "Reset world state");
        Ok(())
    }
}
