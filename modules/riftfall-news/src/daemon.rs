use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use ai_client::WorkersAi;
use github_client::{GithubClient, RepoRef};
use riftfall_common::{Config, NewsItemType, RiftfallError};

use crate::cycle::{evaluate_cycle, CycleOrchestrator};
use crate::history;
use crate::notify;
use crate::source::SupabaseGameSource;
use crate::stats::project;
use crate::store::GithubNewsStore;
use crate::synthesis::{AiNewsWriter, DraftSource, NewsSynthesizer};
use crate::traits::{GameSource, NewsStore, NewsWriter};

/// Counts from one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub appended: usize,
    pub total: usize,
    pub cycle_number: u32,
    pub reset_performed: bool,
    pub used_fallback: bool,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Appended {} news items. Total now: {}. Cycle {}{}{}",
            self.appended,
            self.total,
            self.cycle_number,
            if self.reset_performed { " (reset performed)" } else { "" },
            if self.used_fallback { " [fallback text]" } else { "" },
        )
    }
}

/// One-shot news run: read snapshot and history, write news, persist once.
pub struct NewsDaemon {
    source: Arc<dyn GameSource>,
    store: Arc<dyn NewsStore>,
    synthesizer: NewsSynthesizer,
    orchestrator: CycleOrchestrator,
    max_items: usize,
}

impl NewsDaemon {
    pub fn new(
        source: Arc<dyn GameSource>,
        store: Arc<dyn NewsStore>,
        synthesizer: NewsSynthesizer,
        orchestrator: CycleOrchestrator,
        max_items: usize,
    ) -> Self {
        Self {
            source,
            store,
            synthesizer,
            orchestrator,
            max_items,
        }
    }

    /// Wire the production adapters from validated config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let game = Arc::new(SupabaseGameSource::new(
            &config.supabase_url,
            config.supabase_service_key.clone(),
        ));

        let repo = RepoRef::parse(&config.github_repo)
            .map_err(|e| RiftfallError::Config(e.to_string()))?;
        let store = Arc::new(GithubNewsStore::new(
            GithubClient::new(config.github_token.clone()),
            repo,
            config.github_branch.clone(),
            config.news_file_path.clone(),
        ));

        let writer: Option<Arc<dyn NewsWriter>> = match &config.ai {
            Some(ai) => {
                info!(model = %ai.model, "AI summaries enabled");
                Some(Arc::new(AiNewsWriter::new(WorkersAi::new(
                    ai.account_id.clone(),
                    ai.api_token.clone(),
                    ai.model.clone(),
                ))))
            }
            None => {
                info!("Cloudflare AI not configured, using fallback summaries");
                None
            }
        };

        let notifier = notify::backend_for(config.discord_webhook_url.as_deref());

        Ok(Self::new(
            game.clone(),
            store,
            NewsSynthesizer::new(writer),
            CycleOrchestrator::new(game, notifier),
            config.max_news_items,
        ))
    }

    pub async fn run(&self) -> Result<RunStats> {
        let (loaded, state) = tokio::try_join!(self.store.load(), self.source.fetch_state())?;

        let evaluation = evaluate_cycle(&state, &loaded.news.items);
        info!(
            cycle = evaluation.cycle_number,
            continents = state.continents.len(),
            history = loaded.news.items.len(),
            collapse = evaluation.reset_required,
            "Evaluated cycle"
        );

        let stats = project(&state);
        let synthesis = self
            .synthesizer
            .synthesize(&stats, NewsItemType::Summary, evaluation.summary_meta.clone())
            .await;

        let mut new_items = synthesis.items;
        let extra = evaluation.extra_items(Utc::now());
        let reset_performed = self.orchestrator.execute(&evaluation, &state.continents).await?;
        new_items.extend(extra);

        let appended = new_items.len();
        let news = history::merge(loaded.news, new_items, self.max_items, Utc::now());
        self.store.save(&news, loaded.sha.as_deref()).await?;

        let stats = RunStats {
            appended,
            total: news.items.len(),
            cycle_number: evaluation.cycle_number,
            reset_performed,
            used_fallback: synthesis.source == DraftSource::Fallback,
        };
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_stats_display() {
        let stats = RunStats {
            appended: 3,
            total: 120,
            cycle_number: 2,
            reset_performed: true,
            used_fallback: true,
        };
        assert_eq!(
            stats.to_string(),
            "Appended 3 news items. Total now: 120. Cycle 2 (reset performed) [fallback text]"
        );
    }

    #[test]
    fn from_config_builds_without_network() {
        let config = Config::from_lookup(|k| {
            match k {
                "SUPABASE_URL" => Some("https://abc.supabase.co"),
                "SUPABASE_SERVICE_KEY" => Some("service"),
                "GITHUB_TOKEN" => Some("ghp"),
                "GITHUB_REPO" => Some("riftfall/world-data"),
                _ => None,
            }
            .map(str::to_string)
        })
        .unwrap();

        let daemon = NewsDaemon::from_config(&config).unwrap();
        assert!(!daemon.synthesizer.ai_enabled());
        assert_eq!(daemon.max_items, 200);
    }
}
